//! Error types for asr-prep
//!
//! Fatal errors (empty corpus, unknown layout, configuration) stop the run.
//! Per-sample problems (malformed label, failed segment extraction) are handled
//! where they occur and never reach the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Preparation error type
#[derive(Debug, Error)]
pub enum PrepError {
    /// No sample found across all corpus roots
    #[error("No data found in directories {roots:?}")]
    EmptyCorpus { roots: Vec<PathBuf> },

    /// A corpus root matches none of the supported layouts
    #[error("Unknown corpus layout in {0}")]
    UnknownFormat(PathBuf),

    /// Transcript contains a character outside the label alphabet
    #[error("Incorrect label {transcript:?}: character {character:?} not in alphabet")]
    MalformedLabel { transcript: String, character: char },

    /// Batch assembly cannot make progress
    #[error("No usable samples: {0}")]
    NoUsableSamples(String),

    /// Audio probing or feature extraction failed
    #[error("Audio error: {0}")]
    Audio(String),

    /// Background batch worker failed
    #[error("Batch worker error: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// asr-common error
    #[error("Common error: {0}")]
    Common(#[from] asr_common::Error),
}

/// Result type for preparation operations
pub type PrepResult<T> = Result<T, PrepError>;
