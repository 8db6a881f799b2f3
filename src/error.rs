use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("No diagnosis available: are you trying to load the diagnoses from the held-out dataset?")]
    MissingDiagnosis,

    #[error("Unable to cast {0:?}")]
    UnsupportedValue(String),

    #[error("{0} not implemented")]
    UnsupportedFormat(String),

    #[error("Invalid header format: {0}")]
    InvalidFormat(String),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ChallengeError>;
