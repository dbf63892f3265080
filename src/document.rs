use index_vec::{define_index_type, IndexVec};
use midly::num::u7;

define_index_type! { pub struct TrackIdx = usize; }
pub type TrackVec = IndexVec<TrackIdx, Track>;

/// MIDI controller number for channel volume (CC7)
pub const VOLUME_CONTROLLER: u8 = 7;

/// Builds a vector of notes from `(velocity, pitch)` pairs, one beat each
#[cfg(test)]
macro_rules! notes {
    ( $( ($v: expr, $p: expr) ),* $(,)? ) => {
        vec![ $( $crate::document::Note::new($v, $p, 0, 480) ),* ]
    }
}

/// Position of the note-on event a parsed note came from: SMF track number and
/// event number within that track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRef {
    pub track: usize,
    pub event: usize,
}

/// A note with its loudness, pitch and start/end ticks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub velocity: u7,
    pub pitch: u7,
    pub start: u64,
    pub end: u64,
    pub(crate) origin: Option<EventRef>,
}

impl Note {
    pub fn new(velocity: u8, pitch: u8, start: u64, end: u64) -> Self {
        Self {
            velocity: velocity.into(),
            pitch: pitch.into(),
            start,
            end,
            origin: None,
        }
    }

    pub(crate) fn from_event(velocity: u7, pitch: u7, start: u64, origin: EventRef) -> Self {
        Self {
            velocity,
            pitch,
            start,
            end: start,
            origin: Some(origin),
        }
    }

    pub fn origin(&self) -> Option<EventRef> {
        self.origin
    }
}

/// A controller change. Only [`VOLUME_CONTROLLER`] means anything to the
/// velocity engine, the rest is carried along untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlEvent {
    pub controller: u7,
    pub value: u7,
    pub time: u64,
}

impl ControlEvent {
    pub fn new(controller: u8, value: u8, time: u64) -> Self {
        Self {
            controller: controller.into(),
            value: value.into(),
            time,
        }
    }

    pub fn is_volume(&self) -> bool {
        self.controller.as_int() == VOLUME_CONTROLLER
    }
}

/// One instrument part: the notes and controller events of a single channel
/// within a single SMF track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    /// Raw program number. Anything above 127 has no General MIDI name.
    pub program: u8,
    pub is_drum: bool,
    pub channel: u8,
    pub notes: Vec<Note>,
    pub controls: Vec<ControlEvent>,
}

impl Track {
    pub fn new(program: u8) -> Self {
        Self {
            program,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the track as a drum kit on the General MIDI percussion channel
    pub fn drum(mut self) -> Self {
        self.is_drum = true;
        self.channel = 9;
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn with_control(mut self, event: ControlEvent) -> Self {
        self.controls.push(event);
        self
    }

    pub fn with_volume(self, value: u8, time: u64) -> Self {
        self.with_control(ControlEvent::new(VOLUME_CONTROLLER, value, time))
    }

    pub fn volume_events(&self) -> impl Iterator<Item = &ControlEvent> {
        self.controls.iter().filter(|event| event.is_volume())
    }

    pub fn max_velocity(&self) -> Option<u7> {
        self.notes.iter().map(|note| note.velocity).max()
    }

    pub fn min_velocity(&self) -> Option<u7> {
        self.notes.iter().map(|note| note.velocity).min()
    }
}

/// An ordered set of instrument tracks
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub tracks: TrackVec,
}

impl Document {
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            tracks: tracks.into_iter().collect(),
        }
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.tracks.iter().flat_map(|track| track.notes.iter())
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|track| track.notes.len()).sum()
    }

    pub fn velocities(&self) -> Vec<u8> {
        self.notes().map(|note| note.velocity.as_int()).collect()
    }
}
