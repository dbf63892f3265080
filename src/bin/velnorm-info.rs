use anyhow::{Context, Result};
use std::path::PathBuf;
use structopt::StructOpt;
use velnorm::analysis::analyze;
use velnorm::instrument::display_name;
use velnorm::mute::is_muted;
use velnorm::MidiFile;

/// List the instruments of a MIDI file with their velocity range
#[derive(StructOpt, Debug)]
#[structopt(name = "velnorm-info")]
struct Opt {
    /// Notes at or below this velocity don't count towards the loudest note
    #[structopt(long, default_value = "0")]
    threshold: u8,

    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let data = std::fs::read(&opt.input)
        .with_context(|| format!("Can't read {}", opt.input.display()))?;
    let file = MidiFile::parse(&data)?;
    let document = &file.document;

    println!(
        "{} has {} instruments and {} notes",
        opt.input.display(),
        document.tracks.len(),
        document.note_count()
    );
    for (index, track) in document.tracks.iter_enumerated() {
        let range = match (track.min_velocity(), track.max_velocity()) {
            (Some(min), Some(max)) => format!("{}..{}", min.as_int(), max.as_int()),
            _ => "-".to_string(),
        };
        println!(
            "{:>3} ch {:>2} {:>5} notes  velocity {:<8} {}{}",
            index.index(),
            track.channel + 1,
            track.notes.len(),
            range,
            display_name(track),
            if is_muted(track) { " (muted)" } else { "" },
        );
    }

    let analysis = analyze(document, true, opt.threshold);
    if analysis.is_empty() {
        println!("No note above velocity {} outside muted instruments", opt.threshold);
    } else {
        println!(
            "Loudest note outside muted instruments: {}",
            analysis.max_velocity
        );
    }
    Ok(())
}
