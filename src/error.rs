/// Errors from reading, writing and configuring velocity operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("MIDI parse error: {0}")]
    MidiParse(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),
}

pub type Result<T> = std::result::Result<T, Error>;
