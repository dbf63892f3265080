use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};
use std::path::{Path, PathBuf};

fn midi(delta: u32, channel: u8, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Midi {
            channel: channel.into(),
            message,
        },
    }
}

pub fn note_on(delta: u32, channel: u8, key: u8, vel: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOn {
            key: key.into(),
            vel: vel.into(),
        },
    )
}

pub fn note_off(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOff {
            key: key.into(),
            vel: 64.into(),
        },
    )
}

pub fn controller(delta: u32, channel: u8, controller: u8, value: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::Controller {
            controller: controller.into(),
            value: value.into(),
        },
    )
}

pub fn program_change(delta: u32, channel: u8, program: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::ProgramChange {
            program: program.into(),
        },
    )
}

pub fn track_name(name: &'static str) -> TrackEvent<'static> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    }
}

pub fn tempo(microseconds_per_beat: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_beat.into())),
    }
}

pub fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

/// Encodes a format 1 file at 480 ticks per beat
pub fn smf_bytes(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let smf = Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(480.into())),
        tracks,
    };
    let mut buf = Vec::new();
    smf.write_std(&mut buf).expect("can't encode test MIDI file");
    buf
}

/// Piano at velocity 60, muted strings at 127 and a drum note at velocity 5,
/// each in its own track after a tempo track
pub fn phantom_tracks() -> Vec<Vec<TrackEvent<'static>>> {
    vec![
        vec![tempo(500_000), end_of_track()],
        vec![
            track_name("Piano"),
            program_change(0, 0, 0),
            note_on(0, 0, 60, 60),
            note_off(480, 0, 60),
            end_of_track(),
        ],
        vec![
            track_name("Strings (Muted)"),
            program_change(0, 1, 40),
            controller(0, 1, 7, 0),
            note_on(0, 1, 72, 127),
            note_off(480, 1, 72),
            end_of_track(),
        ],
        vec![
            track_name("Phantom Noise"),
            note_on(0, 9, 36, 5),
            note_off(480, 9, 36),
            end_of_track(),
        ],
    ]
}

pub fn write_midi(dir: &Path, name: &str, tracks: Vec<Vec<TrackEvent<'static>>>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, smf_bytes(tracks)).expect("can't write test MIDI file");
    path
}

/// Note-on velocities of a MIDI file on disk, in track and event order
pub fn note_on_velocities(path: &Path) -> Vec<u8> {
    let data = std::fs::read(path).expect("can't read MIDI file");
    let smf = Smf::parse(&data).expect("can't parse MIDI file");
    smf.tracks
        .iter()
        .flatten()
        .filter_map(|event| match event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { vel, .. },
                ..
            } if vel.as_int() > 0 => Some(vel.as_int()),
            _ => None,
        })
        .collect()
}
