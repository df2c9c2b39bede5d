//! Error types for the tabclean pipeline

use thiserror::Error;

/// Result type alias for tabclean operations
pub type Result<T> = std::result::Result<T, CleanError>;

/// Main error type for the cleaning pipeline
#[derive(Error, Debug)]
pub enum CleanError {
    /// Malformed or unparsable input payload. Fatal to the run: surfaced
    /// before any pipeline step executes.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// A step's configuration references a missing column, an invalid
    /// method, or a name collision. Local to the step: the step is skipped
    /// and the pipeline continues.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A per-column computation could not produce a defined result.
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<csv::Error> for CleanError {
    fn from(err: csv::Error) -> Self {
        CleanError::Ingestion(err.to_string())
    }
}

impl From<serde_json::Error> for CleanError {
    fn from(err: serde_json::Error) -> Self {
        CleanError::Serialization(err.to_string())
    }
}
