use crate::{
    document::{Document, TrackIdx},
    mute::is_muted,
};
use tracing::debug;

/// Result of the read-only pass over a document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    /// Loudest qualifying velocity, 0 if no note qualified
    pub max_velocity: u8,
    /// Tracks with notes that were left out because they are muted
    pub muted: Vec<TrackIdx>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.max_velocity == 0
    }
}

/// Finds the loudest note that may set the scale factor.
///
/// A note qualifies if its velocity is above `velocity_threshold` and, when
/// `ignore_muted` is set, its track is not muted. The two filters are
/// independent.
pub fn analyze(document: &Document, ignore_muted: bool, velocity_threshold: u8) -> Analysis {
    let mut max_velocity = 0;
    let mut muted = vec![];
    for (track_index, track) in document.tracks.iter_enumerated() {
        if ignore_muted && is_muted(track) {
            if !track.notes.is_empty() {
                muted.push(track_index);
            }
            continue;
        }
        let loudest = track
            .notes
            .iter()
            .map(|note| note.velocity.as_int())
            .filter(|&velocity| velocity > velocity_threshold)
            .max();
        if let Some(loudest) = loudest {
            max_velocity = max_velocity.max(loudest);
        }
    }
    debug!(
        max_velocity,
        muted_tracks = muted.len(),
        velocity_threshold,
        "analyzed document"
    );
    Analysis {
        max_velocity,
        muted,
    }
}

/// How a normalize operation scales, given the target and analyzed maximum
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Derivation {
    /// Nothing qualified, so there is nothing to scale towards
    Empty,
    /// The maximum already equals the target
    AlreadyNormalized,
    Scale(f64),
}

impl Derivation {
    pub fn factor(&self) -> Option<f64> {
        match self {
            Derivation::Empty => None,
            Derivation::AlreadyNormalized => Some(1.0),
            Derivation::Scale(factor) => Some(*factor),
        }
    }
}

pub fn derive_scale_factor(target_velocity: u8, max_velocity: u8) -> Derivation {
    if max_velocity == 0 {
        Derivation::Empty
    } else if max_velocity == target_velocity {
        Derivation::AlreadyNormalized
    } else {
        Derivation::Scale(f64::from(target_velocity) / f64::from(max_velocity))
    }
}
