//! Error types for the scout-model crate.

use thiserror::Error;

/// Errors that can occur while loading jobs and seed files.
#[derive(Error, Debug)]
pub enum ModelError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File content couldn't be parsed
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
