//! Common error types for the AMOC tooling

use thiserror::Error;

/// Common result type for AMOC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across AMOC crates
///
/// Only validation and configuration failures live here. Attribute
/// conflicts are never errors; they are resolved and logged.
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset carries a `source_file` marker for a different file
    #[error("Source file mismatch: dataset was read from '{found}', standardising as '{expected}'")]
    SourceMismatch { expected: String, found: String },

    /// No metadata bundle exists for the requested array
    #[error("Unknown array: no metadata found for '{0}'")]
    UnknownArray(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
