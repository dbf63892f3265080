//! Normalize or equalize the note velocities of MIDI files.
//!
//! The engine works on a [`Document`], an instrument-level view of a MIDI
//! file: [`normalize`] scales every note so the loudest qualifying one
//! reaches a target velocity, [`equalize`] scales every note to a percentage.
//! [`Job`] wraps either operation with reading and writing the file.

#[macro_use]
pub mod document;

pub mod analysis;
pub mod cmdline;
pub mod error;
pub mod instrument;
pub mod interrupt;
pub mod job;
pub mod midi_file;
pub mod mute;
pub mod ops;
pub mod options;
pub mod output;
pub mod report;
pub mod rescale;
pub mod telemetry;
pub mod worker;

#[cfg(test)]
mod test_helpers;

pub use document::{ControlEvent, Document, Note, Track, TrackIdx, TrackVec};
pub use error::{Error, Result};
pub use job::{Job, JobOutcome, Mode};
pub use midi_file::MidiFile;
pub use ops::{equalize, normalize, OperationResult, Status};
pub use options::{EqualizeOptions, NormalizeOptions};
pub use report::Report;
