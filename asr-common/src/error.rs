//! Common error types for the ASR tools

use thiserror::Error;

/// Common result type for ASR operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the workspace
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error for persisted records
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
