//! Capability traits consumed by the preparation pipeline
//!
//! Audio decoding, segment carving, feature extraction and the training step itself
//! live outside this crate. They are reached only through these traits so that the
//! ingestion and batching logic can be driven by real tools or by test doubles.

use crate::models::Batch;
use crate::PrepResult;
use std::path::Path;

// ============================================================================
// Ingestion capabilities
// ============================================================================

/// Reports the playing time of an audio file
pub trait DurationProvider: Send + Sync {
    /// Duration in seconds
    fn duration_seconds(&self, audio_path: &Path) -> PrepResult<f64>;
}

/// Outcome of carving one segment out of a longer recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Segment written to the destination
    Extracted,
    /// Extraction was attempted and failed; the segment is unusable
    Failed,
    /// Destination already present, nothing done
    AlreadyExists,
}

impl ExtractOutcome {
    /// Whether the segment can be used as a sample
    pub fn is_usable(self) -> bool {
        !matches!(self, ExtractOutcome::Failed)
    }
}

/// Carves `[start, end]` seconds out of `source` into a WAV file at `destination`
pub trait SegmentExtractor: Send + Sync {
    fn extract_segment(
        &self,
        source: &Path,
        destination: &Path,
        start: f64,
        end: f64,
    ) -> ExtractOutcome;
}

// ============================================================================
// Batching capabilities
// ============================================================================

/// Acoustic features of one audio file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    /// Feature vectors, one per frame (possibly padded)
    pub frames: Vec<Vec<f32>>,
    /// Frame count before any padding or truncation
    pub original_length: usize,
}

/// Turns an audio file into acoustic features
pub trait FeatureExtractor: Send + Sync {
    fn features(&self, audio_path: &Path) -> PrepResult<Features>;
}

/// The external training step
///
/// Owns the model graph, optimizer state and learning rate.
pub trait Trainer: Send {
    /// Run one batch; `forward_only` evaluates without updating weights. Returns the loss.
    fn step(&mut self, batch: &Batch, forward_only: bool) -> PrepResult<f32>;

    /// Apply the configured decay to the learning rate and return the new rate
    fn decay_learning_rate(&mut self) -> f64;

    /// Persist model weights into `checkpoint_dir`
    fn save(&mut self, checkpoint_dir: &Path) -> PrepResult<()>;
}
