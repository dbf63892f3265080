use crate::{
    analysis::{analyze, derive_scale_factor, Derivation},
    document::Document,
    instrument::display_name,
    options::{EqualizeOptions, NormalizeOptions},
    report::{Report, StatusLabel},
    rescale::{rescale, TrackChange},
};
use tracing::{debug, warn};

/// How an operation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Velocities were rescaled, and saved when run as a job
    Completed,
    /// No note qualified for analysis. Nothing was changed.
    EmptyInput,
    /// The input could not be read or parsed. Nothing was changed.
    LoadFailure,
    /// Velocities were rescaled in memory but could not be written out
    SaveFailure,
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::LoadFailure | Status::SaveFailure)
    }
}

/// Transcript and outcome of a normalize or equalize call. The document
/// itself is mutated in place through the caller's borrow.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationResult {
    pub report: Report,
    pub status: Status,
    pub scale_factor: Option<f64>,
    pub changes: Vec<TrackChange>,
}

impl OperationResult {
    pub(crate) fn aborted(report: Report, status: Status) -> Self {
        Self {
            report,
            status,
            scale_factor: None,
            changes: vec![],
        }
    }
}

/// Scales the whole document so that its loudest qualifying note reaches
/// `options.target_velocity`.
///
/// Muted tracks (see [`crate::mute::is_muted`]) and notes at or below the
/// threshold are left out of the search for the loudest note, but every note
/// is scaled by the resulting factor. An already normalized document is still
/// rescaled with a factor of 1.0.
pub fn normalize(document: &mut Document, options: &NormalizeOptions) -> OperationResult {
    let mut report = Report::default();
    let analysis = analyze(
        document,
        options.ignore_muted,
        options.velocity_threshold,
    );
    for &track_index in &analysis.muted {
        report.line(format!(
            "Skipping muted instrument for max velocity calc: {}",
            display_name(&document.tracks[track_index])
        ));
    }

    let target = options.target_velocity;
    let factor = match derive_scale_factor(target, analysis.max_velocity) {
        Derivation::Empty => {
            warn!("no note qualifies for normalization");
            report.line("Warning: Max velocity is 0. Is the MIDI file empty?");
            return OperationResult::aborted(report, Status::EmptyInput);
        }
        Derivation::AlreadyNormalized => {
            report.line(format!(
                "MIDI file is already normalized (max velocity is {}).",
                target
            ));
            1.0
        }
        Derivation::Scale(factor) => {
            report.line(format!(
                "Max velocity found: {}. Scaling by {:.2} to target {}...",
                analysis.max_velocity, factor, target
            ));
            factor
        }
    };
    report.summary(format!("Global scaling factor: {:.3}", factor));
    apply(document, factor, StatusLabel::Normalized, report)
}

/// Scales every velocity to `options.level` percent
pub fn equalize(document: &mut Document, options: &EqualizeOptions) -> OperationResult {
    let mut report = Report::default();
    let factor = options.scale_factor();
    report.summary(format!(
        "Target Level: {}% (Factor: {:.2})",
        options.level, factor
    ));
    apply(document, factor, StatusLabel::Scaled, report)
}

fn apply(
    document: &mut Document,
    factor: f64,
    label: StatusLabel,
    mut report: Report,
) -> OperationResult {
    let changes = rescale(document, factor);
    for change in &changes {
        report.track_block(&display_name(&document.tracks[change.track]), change, label);
    }
    debug!(factor, tracks = changes.len(), "rescaled document");
    OperationResult {
        report,
        status: Status::Completed,
        scale_factor: Some(factor),
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Note, Track};
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    fn phantom_document() -> Document {
        Document::new([
            Track::new(0).named("Piano").with_notes(notes![(60, 60)]),
            Track::new(40)
                .named("Strings (Muted)")
                .with_notes(notes![(127, 72)])
                .with_volume(0, 0),
            Track::new(0)
                .named("Phantom Noise")
                .drum()
                .with_notes(notes![(5, 36)]),
        ])
    }

    fn separator() -> String {
        "-".repeat(40)
    }

    #[test]
    fn equalize_scales_to_percentage() {
        let mut document =
            Document::new([Track::new(0).named("Test Piano").with_notes(notes![(127, 60)])]);
        let result = equalize(&mut document, &EqualizeOptions::default());
        assert_eq!(result.status, Status::Completed);
        assert_eq!(document.velocities(), vec![101]);
        assert_eq!(
            result.report.lines(),
            [
                separator(),
                "Target Level: 80% (Factor: 0.80)".to_string(),
                separator(),
                "Instrument: Test Piano".to_string(),
                "  - Notes: 1".to_string(),
                "  - Max Velocity: 127 -> 101".to_string(),
                "  - Status: Scaled".to_string(),
                separator(),
            ]
        );
    }

    #[test]
    fn normalize_single_quiet_note() {
        let mut document = Document::new([Track::new(0).with_notes(notes![(64, 60)])]);
        let result = normalize(&mut document, &NormalizeOptions::default());
        assert_eq!(result.status, Status::Completed);
        assert_approx_eq!(result.scale_factor.unwrap(), 127.0 / 64.0);
        assert_eq!(document.velocities(), vec![127]);
        assert_eq!(
            result.report.lines(),
            [
                "Max velocity found: 64. Scaling by 1.98 to target 127...".to_string(),
                separator(),
                "Global scaling factor: 1.984".to_string(),
                separator(),
                "Instrument: Acoustic Grand Piano".to_string(),
                "  - Notes: 1".to_string(),
                "  - Max Velocity: 64 -> 127".to_string(),
                "  - Status: Normalized".to_string(),
                separator(),
            ]
        );
    }

    #[test]
    fn normalize_ignores_muted_and_phantom_notes_for_maximum() {
        let mut document = phantom_document();
        let options = NormalizeOptions {
            velocity_threshold: 10,
            ..Default::default()
        };
        let result = normalize(&mut document, &options);
        assert_approx_eq!(result.scale_factor.unwrap(), 127.0 / 60.0);
        // 60 * 127/60 may land just below 127 in floating point
        let velocities = document.velocities();
        assert!(velocities[0] >= 126);
        // the muted and phantom notes are still scaled by the same factor
        assert_eq!(velocities[1], 127);
        assert_eq!(velocities[2], 10);
        assert_eq!(
            result.report.lines()[0],
            "Skipping muted instrument for max velocity calc: Strings (Muted)"
        );
    }

    #[test]
    fn normalize_with_muted_tracks_included() {
        let mut document = phantom_document();
        let options = NormalizeOptions {
            ignore_muted: false,
            velocity_threshold: 10,
            ..Default::default()
        };
        let result = normalize(&mut document, &options);
        assert_eq!(result.report.lines()[0], "MIDI file is already normalized (max velocity is 127).");
        assert_eq!(document.velocities(), vec![60, 127, 5]);
    }

    #[test]
    fn normalize_all_zero_velocities_is_empty_input() {
        let mut document = Document::new([Track::new(0).with_notes(notes![(0, 60), (0, 62)])]);
        let before = document.clone();
        let result = normalize(&mut document, &NormalizeOptions::default());
        assert_eq!(result.status, Status::EmptyInput);
        assert!(!result.status.is_failure());
        assert_eq!(result.scale_factor, None);
        assert_eq!(
            result.report.lines(),
            ["Warning: Max velocity is 0. Is the MIDI file empty?"]
        );
        assert_eq!(document, before);
    }

    #[test]
    fn normalize_only_phantom_notes_is_empty_input() {
        let mut document = phantom_document();
        let before = document.clone();
        let options = NormalizeOptions {
            velocity_threshold: 127,
            ..Default::default()
        };
        assert_eq!(normalize(&mut document, &options).status, Status::EmptyInput);
        assert_eq!(document, before);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut document = Document::new([
            Track::new(0).with_notes(notes![(64, 60), (3, 61), (50, 62)]),
            Track::new(33).with_notes(notes![(17, 40)]),
        ]);
        normalize(&mut document, &NormalizeOptions::default());
        let once = document.velocities();
        let result = normalize(&mut document, &NormalizeOptions::default());
        assert_eq!(result.status, Status::Completed);
        assert_eq!(result.scale_factor, Some(1.0));
        assert_eq!(
            result.report.lines()[0],
            "MIDI file is already normalized (max velocity is 127)."
        );
        assert_eq!(document.velocities(), once);
    }

    #[test]
    fn tracks_without_notes_produce_no_lines() {
        let mut document = Document::new([
            Track::new(0).named("Conductor"),
            Track::new(0).named("Silent").with_volume(0, 0),
            Track::new(0).named("Lead").with_notes(notes![(100, 60)]),
        ]);
        let result = normalize(&mut document, &NormalizeOptions::default());
        assert_eq!(result.changes.len(), 1);
        let text = result.report.to_string();
        assert!(!text.contains("Conductor"));
        assert!(!text.contains("Silent"));
        assert!(text.contains("Instrument: Lead"));
    }

    #[test]
    fn report_follows_track_order() {
        let mut document = Document::new([
            Track::new(0).named("B").with_notes(notes![(30, 60)]),
            Track::new(0).named("A").with_notes(notes![(60, 60)]),
        ]);
        let result = equalize(&mut document, &EqualizeOptions { level: 50 });
        let instruments = result
            .report
            .lines()
            .iter()
            .filter(|line| line.starts_with("Instrument: "))
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(instruments, ["Instrument: B", "Instrument: A"]);
        assert_eq!(document.velocities(), vec![15, 30]);
    }

    #[rstest(
        level,
        case(0),
        case(1),
        case(50),
        case(80),
        case(100),
        case(200),
        case(10_000),
    )]
    fn equalize_keeps_velocities_in_range(level: u32) {
        let mut document = Document::new([Track::new(0).with_notes(
            (0..=127).map(|velocity| Note::new(velocity, 60, 0, 10)),
        )]);
        equalize(&mut document, &EqualizeOptions { level });
        assert!(document
            .velocities()
            .iter()
            .all(|velocity| (1..=127).contains(velocity)));
    }

    #[rstest(target, case(1), case(64), case(100), case(127))]
    fn normalize_keeps_velocities_in_range(target: u8) {
        let mut document = Document::new([
            Track::new(0).with_notes((1..=127).map(|velocity| Note::new(velocity, 60, 0, 10))),
            Track::new(0).with_volume(0, 0).with_notes(notes![(127, 40)]),
        ]);
        let options = NormalizeOptions {
            target_velocity: target,
            velocity_threshold: 20,
            ..Default::default()
        };
        normalize(&mut document, &options);
        assert!(document
            .velocities()
            .iter()
            .all(|velocity| (1..=127).contains(velocity)));
    }
}
