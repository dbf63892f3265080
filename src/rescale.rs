use crate::document::{Document, TrackIdx};
use midly::num::u7;

const MIN_VELOCITY: i64 = 1;
const MAX_VELOCITY: i64 = 127;

/// Loudest velocity of a track before and after rescaling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackChange {
    pub track: TrackIdx,
    pub notes: usize,
    pub before: u8,
    pub after: u8,
}

/// Scales one velocity, dropping the fractional part. The result stays within
/// 1..=127 so a quiet note never turns into a note-off.
pub fn scale_velocity(velocity: u7, factor: f64) -> u7 {
    let scaled = (f64::from(velocity.as_int()) * factor) as i64;
    u7::from(scaled.clamp(MIN_VELOCITY, MAX_VELOCITY) as u8)
}

/// Applies `factor` to every note of every track.
///
/// Returns the velocity range change of each track that has notes, in track
/// order.
pub fn rescale(document: &mut Document, factor: f64) -> Vec<TrackChange> {
    let mut changes = vec![];
    for (track_index, track) in document.tracks.iter_mut_enumerated() {
        let before = match track.max_velocity() {
            Some(velocity) => velocity.as_int(),
            None => continue,
        };
        let mut after = 0;
        for note in track.notes.iter_mut() {
            note.velocity = scale_velocity(note.velocity, factor);
            after = after.max(note.velocity.as_int());
        }
        changes.push(TrackChange {
            track: track_index,
            notes: track.notes.len(),
            before,
            after,
        });
    }
    changes
}
