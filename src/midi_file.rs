use crate::{
    document::{ControlEvent, Document, EventRef, Note, Track},
    error::{Error, Result},
};
use midly::{
    num::{u4, u7},
    MetaMessage::TrackName,
    MidiMessage::{Controller, NoteOff, NoteOn, ProgramChange},
    Smf, TrackEvent,
    TrackEventKind::{Meta, Midi},
};
use std::{
    collections::{HashMap, VecDeque},
    path::Path,
};

/// A parsed Standard MIDI File together with its instrument view.
///
/// Saving writes the document's note velocities back into the original note-on
/// events. All other events, including note-off velocities, are written out
/// exactly as they were read.
pub struct MidiFile<'a> {
    smf: Smf<'a>,
    pub document: Document,
}

impl<'a> MidiFile<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let smf = Smf::parse(data).map_err(|e| Error::MidiParse(e.to_string()))?;
        let document = read_document(&smf);
        Ok(Self { smf, document })
    }

    fn store_velocities(&mut self) {
        for note in self.document.notes() {
            let Some(EventRef { track, event }) = note.origin() else {
                continue;
            };
            let kind = self
                .smf
                .tracks
                .get_mut(track)
                .and_then(|events| events.get_mut(event))
                .map(|event| &mut event.kind);
            if let Some(Midi {
                message: NoteOn { vel, .. },
                ..
            }) = kind
            {
                *vel = note.velocity;
            }
        }
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.store_velocities();
        let mut buf = Vec::new();
        self.smf.write_std(&mut buf)?;
        Ok(buf)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.store_velocities();
        self.smf.save(path)?;
        Ok(())
    }
}

/// Notes and controllers of one channel within one SMF track, while reading
struct Part {
    channel: u4,
    track: Track,
    program_seen: bool,
    // indices into `track.notes` of notes still sounding, oldest first
    sounding: HashMap<u8, VecDeque<usize>>,
}

impl Part {
    fn new(channel: u4) -> Self {
        let mut track = Track::new(0);
        track.channel = channel.as_int();
        track.is_drum = track.channel == 9;
        Self {
            channel,
            track,
            program_seen: false,
            sounding: HashMap::new(),
        }
    }

    fn start_note(&mut self, key: u7, vel: u7, tick: u64, origin: EventRef) {
        self.sounding
            .entry(key.as_int())
            .or_default()
            .push_back(self.track.notes.len());
        self.track.notes.push(Note::from_event(vel, key, tick, origin));
    }

    fn end_note(&mut self, key: u7, tick: u64) {
        let oldest = self
            .sounding
            .get_mut(&key.as_int())
            .and_then(|sounding| sounding.pop_front());
        if let Some(index) = oldest {
            self.track.notes[index].end = tick;
        }
    }

    fn finish(mut self, name: Option<&str>, last_tick: u64) -> Track {
        for index in self.sounding.drain().flat_map(|(_, sounding)| sounding) {
            self.track.notes[index].end = last_tick;
        }
        self.track.name = name.map(str::to_string);
        self.track
    }
}

fn read_track(track_number: usize, events: &[TrackEvent]) -> Vec<Track> {
    let mut name: Option<String> = None;
    let mut parts: Vec<Part> = vec![];
    let mut tick: u64 = 0;
    for (event_number, event) in events.iter().enumerate() {
        tick += u64::from(event.delta.as_int());
        match event.kind {
            Meta(TrackName(bytes)) if name.is_none() => {
                name = Some(String::from_utf8_lossy(bytes).into_owned());
            }
            Midi { channel, message } => {
                let position = match parts.iter().position(|part| part.channel == channel) {
                    Some(position) => position,
                    None => {
                        parts.push(Part::new(channel));
                        parts.len() - 1
                    }
                };
                let part = &mut parts[position];
                match message {
                    NoteOn { key, vel } if vel.as_int() > 0 => {
                        let origin = EventRef {
                            track: track_number,
                            event: event_number,
                        };
                        part.start_note(key, vel, tick, origin);
                    }
                    NoteOn { key, .. } | NoteOff { key, .. } => part.end_note(key, tick),
                    Controller { controller, value } => part.track.controls.push(ControlEvent {
                        controller,
                        value,
                        time: tick,
                    }),
                    ProgramChange { program } if !part.program_seen => {
                        part.track.program = program.as_int();
                        part.program_seen = true;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    parts
        .into_iter()
        .map(|part| part.finish(name.as_deref(), tick))
        .collect()
}

/// Splits every SMF track into one instrument track per channel, in order of
/// first appearance
pub fn read_document(smf: &Smf) -> Document {
    Document::new(
        smf.tracks
            .iter()
            .enumerate()
            .flat_map(|(track_number, events)| read_track(track_number, events)),
    )
}
