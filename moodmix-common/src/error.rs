//! Common error types for MoodMix

use thiserror::Error;

/// Common result type for MoodMix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MoodMix crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tabular source (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog source lacks a column the loader cannot do without
    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(String),

    /// Catalog source parsed but no usable rows survived filtering
    #[error("Catalog has no usable rows")]
    EmptyCatalog,
}
