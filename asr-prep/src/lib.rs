//! asr-prep library interface
//!
//! Speech-corpus ingestion and checkpoint lifecycle for acoustic model training:
//! - Discovers and parses four corpus layouts into one sample list
//! - Caches the list per ordered set of corpus roots
//! - Decides whether a run resumes, branches or overrides a checkpoint lineage
//! - Assembles and prefetches batches for an external trainer

pub mod audio;
pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{PrepError, PrepResult};
pub use crate::models::{CorpusFormat, Sample};
