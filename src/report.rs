use crate::rescale::TrackChange;
use std::fmt::{self, Display};

const SEPARATOR_WIDTH: usize = 40;

/// Label written at the end of each instrument block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLabel {
    Normalized,
    Scaled,
}

impl Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::Normalized => f.write_str("Normalized"),
            StatusLabel::Scaled => f.write_str("Scaled"),
        }
    }
}

/// Ordered, human-readable transcript of an operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn separator(&mut self) {
        self.line("-".repeat(SEPARATOR_WIDTH));
    }

    /// A single line framed by separators
    pub fn summary(&mut self, line: impl Into<String>) {
        self.separator();
        self.line(line);
        self.separator();
    }

    pub fn track_block(&mut self, name: &str, change: &TrackChange, label: StatusLabel) {
        self.line(format!("Instrument: {}", name));
        self.line(format!("  - Notes: {}", change.notes));
        self.line(format!(
            "  - Max Velocity: {} -> {}",
            change.before, change.after
        ));
        self.line(format!("  - Status: {}", label));
        self.separator();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
