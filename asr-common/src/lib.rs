//! # ASR Common Library
//!
//! Shared code for the speech-training preparation tools:
//! - Error type shared by every crate in the workspace
//! - Hyperparameter model and TOML configuration loading
//! - Hyperparameter snapshot persistence (one per checkpoint directory)
//! - Logging level resolution and subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod params;
pub mod snapshot;

pub use error::{Error, Result};
pub use params::{DatasetDirs, HyperParams};
