//! Data models for corpus ingestion and batching

pub mod batch;
pub mod sample;

pub use batch::Batch;
pub use sample::{CorpusFormat, Sample};
