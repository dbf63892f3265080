use crate::{
    document::Document,
    error::{Error, Result},
    midi_file::MidiFile,
    ops::{equalize, normalize, OperationResult, Status},
    options::{EqualizeOptions, NormalizeOptions},
    output::output_path,
    report::Report,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which operation a job runs, with its parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normalize(NormalizeOptions),
    Equalize(EqualizeOptions),
}

impl Mode {
    /// Word used in derived file names and in the transcript
    pub fn suffix(&self) -> &'static str {
        match self {
            Mode::Normalize(_) => "normalized",
            Mode::Equalize(_) => "equalized",
        }
    }

    pub fn apply(&self, document: &mut Document) -> OperationResult {
        match self {
            Mode::Normalize(options) => normalize(document, options),
            Mode::Equalize(options) => equalize(document, options),
        }
    }
}

/// Load a MIDI file, rescale its velocities and save the result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    input: PathBuf,
    output: Option<PathBuf>,
    mode: Mode,
}

/// What happened to one file
#[derive(Clone, Debug, PartialEq)]
pub struct JobOutcome {
    pub input: PathBuf,
    /// Where the result was written, or would have been on a save failure
    pub output: Option<PathBuf>,
    pub status: Status,
    pub report: Report,
}

impl Job {
    pub fn normalize(
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
        options: NormalizeOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            input: input.into(),
            output,
            mode: Mode::Normalize(options),
        })
    }

    pub fn equalize(
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
        options: EqualizeOptions,
    ) -> Result<Self> {
        Ok(Self {
            input: input.into(),
            output,
            mode: Mode::Equalize(options),
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn outcome(&self, report: Report, status: Status, output: Option<PathBuf>) -> JobOutcome {
        JobOutcome {
            input: self.input.clone(),
            output,
            status,
            report,
        }
    }

    fn load_failure(&self, err: Error) -> JobOutcome {
        warn!(input = %self.input.display(), %err, "can't load MIDI file");
        let mut report = Report::default();
        report.line(format!("Error loading MIDI file: {}", err));
        self.outcome(report, Status::LoadFailure, None)
    }

    fn save_failure(&self, mut report: Report, err: Error, output: Option<PathBuf>) -> JobOutcome {
        warn!(input = %self.input.display(), %err, "can't save MIDI file");
        report.line(format!(
            "Error saving MIDI file: {} (the {} result was not saved)",
            err,
            self.mode.suffix()
        ));
        self.outcome(report, Status::SaveFailure, output)
    }

    /// Runs the job to completion. Failures end up in the transcript and the
    /// status, never as an error, so one bad file can't stop a batch.
    pub fn run(&self) -> JobOutcome {
        info!(input = %self.input.display(), mode = self.mode.suffix(), "starting job");
        let data = match std::fs::read(&self.input) {
            Ok(data) => data,
            Err(err) => return self.load_failure(err.into()),
        };
        let mut file = match MidiFile::parse(&data) {
            Ok(file) => file,
            Err(err) => return self.load_failure(err),
        };

        let OperationResult {
            mut report, status, ..
        } = self.mode.apply(&mut file.document);
        if status != Status::Completed {
            return self.outcome(report, status, None);
        }

        let suffix = self.mode.suffix();
        let output = match output_path(&self.input, self.output.as_deref(), suffix) {
            Ok(output) => output,
            Err(err) => return self.save_failure(report, err, None),
        };
        if let Err(err) = file.save(&output) {
            return self.save_failure(report, err, Some(output));
        }
        info!(output = %output.display(), "saved");
        report.line(format!(
            "Successfully saved {} MIDI to: {}",
            suffix,
            output.display()
        ));
        self.outcome(report, Status::Completed, Some(output))
    }
}
