//! Error types for importsym

use thiserror::Error;

/// importsym error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The host cannot run the pipeline (missing `cpp`, missing header dirs)
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Invalid symbol list: {0}")]
    Request(String),

    #[error("Preprocessing failed: {0}")]
    Preprocess(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error belongs to the preprocess/parse stage of a run
    pub fn is_parse_stage(&self) -> bool {
        matches!(self, Error::Preprocess(_) | Error::Parse(_))
    }
}

/// Result type alias for importsym
pub type Result<T> = std::result::Result<T, Error>;
