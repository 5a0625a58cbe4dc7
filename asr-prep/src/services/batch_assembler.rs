//! Batch assembly
//!
//! Walks the dataset from a pointer, wrapping to the start, until a full batch of usable
//! samples is collected. A sample is skipped (with a warning) when its label cannot be
//! encoded, when its features cannot be computed, or when either sequence is longer than
//! the configured limit. Samples may repeat within a batch on datasets smaller than the
//! batch size.
//!
//! Holds no mutable state, so one assembler can be shared by the train and test workers.

use crate::models::{Batch, Sample};
use crate::services::label_encoder::LabelEncoder;
use crate::types::FeatureExtractor;
use crate::{PrepError, PrepResult};
use asr_common::params::HyperParams;
use std::sync::Arc;
use tracing::warn;

/// Size limits for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    pub batch_size: usize,
    pub max_input_seq_length: usize,
    pub max_target_seq_length: usize,
}

impl BatchSpec {
    pub fn from_params(params: &HyperParams) -> Self {
        Self {
            batch_size: params.batch_size,
            max_input_seq_length: params.max_input_seq_length,
            max_target_seq_length: params.max_target_seq_length,
        }
    }

    /// Whole batches in one pass over `dataset_len` samples
    pub fn num_batches(&self, dataset_len: usize) -> usize {
        if self.batch_size == 0 {
            return 0;
        }
        dataset_len / self.batch_size
    }
}

pub struct BatchAssembler {
    spec: BatchSpec,
    features: Arc<dyn FeatureExtractor>,
    encoder: LabelEncoder,
}

impl BatchAssembler {
    pub fn new(spec: BatchSpec, features: Arc<dyn FeatureExtractor>) -> Self {
        Self {
            spec,
            features,
            encoder: LabelEncoder::new(),
        }
    }

    pub fn spec(&self) -> BatchSpec {
        self.spec
    }

    /// Assemble the batch starting at `pointer`
    ///
    /// Fails with [`PrepError::NoUsableSamples`] if the dataset is empty or a full pass
    /// over it accepts nothing.
    pub fn assemble(&self, dataset: &[Sample], pointer: usize) -> PrepResult<Batch> {
        if dataset.is_empty() {
            return Err(PrepError::NoUsableSamples("dataset is empty".to_string()));
        }
        if self.spec.batch_size == 0 {
            return Err(PrepError::NoUsableSamples("batch size is zero".to_string()));
        }

        let mut batch = Batch::default();
        let mut pointer = pointer % dataset.len();
        let mut rejected_in_a_row = 0;

        while batch.len() < self.spec.batch_size {
            if rejected_in_a_row >= dataset.len() {
                return Err(PrepError::NoUsableSamples(format!(
                    "all {} samples rejected",
                    dataset.len()
                )));
            }

            let sample = &dataset[pointer];
            pointer = (pointer + 1) % dataset.len();

            if self.push_sample(&mut batch, sample) {
                rejected_in_a_row = 0;
            } else {
                rejected_in_a_row += 1;
            }
        }

        batch.next_pointer = pointer;
        Ok(batch)
    }

    /// Add `sample` as the next row; false if it was rejected
    fn push_sample(&self, batch: &mut Batch, sample: &Sample) -> bool {
        let labels = match self.encoder.encode(&sample.transcript) {
            Ok(labels) => labels,
            Err(e) => {
                warn!(path = %sample.audio_path.display(), "{}", e);
                return false;
            }
        };

        let features = match self.features.features(&sample.audio_path) {
            Ok(features) => features,
            Err(e) => {
                warn!(path = %sample.audio_path.display(), "Feature extraction failed: {}", e);
                return false;
            }
        };

        if labels.len() > self.spec.max_target_seq_length
            || features.original_length > self.spec.max_input_seq_length
        {
            warn!(
                path = %sample.audio_path.display(),
                input = features.original_length,
                text = labels.len(),
                "Sample too long, skipped"
            );
            return false;
        }

        let row = batch.len();
        batch
            .target_indices
            .extend((0..labels.len()).map(|position| (row, position)));
        batch.target_lengths.push(labels.len());
        batch.target_labels.extend(labels);
        batch
            .input_lengths
            .push(features.original_length.min(self.spec.max_input_seq_length));
        batch.inputs.push(features.frames);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Features;
    use std::path::Path;

    /// Feature length taken from the file stem, e.g. `/x/12.wav` → 12 frames
    struct StemLengthFeatures;

    impl FeatureExtractor for StemLengthFeatures {
        fn features(&self, audio_path: &Path) -> PrepResult<Features> {
            let length: usize = audio_path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| PrepError::Audio("unreadable".to_string()))?;
            Ok(Features {
                frames: vec![vec![0.0; 2]; length],
                original_length: length,
            })
        }
    }

    fn assembler(batch_size: usize) -> BatchAssembler {
        BatchAssembler::new(
            BatchSpec {
                batch_size,
                max_input_seq_length: 10,
                max_target_seq_length: 6,
            },
            Arc::new(StemLengthFeatures),
        )
    }

    #[test]
    fn test_batch_layout() {
        let dataset = vec![Sample::new("/a/3.wav", "ab"), Sample::new("/a/4.wav", "c")];

        let batch = assembler(2).assemble(&dataset, 0).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.input_lengths, vec![3, 4]);
        assert_eq!(batch.target_lengths, vec![3, 2]);
        assert_eq!(batch.target_labels, vec![0, 1, 30, 2, 30]);
        assert_eq!(
            batch.target_indices,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]
        );
        assert_eq!(batch.next_pointer, 0);
    }

    #[test]
    fn test_pointer_wraps_and_skips_unusable() {
        let dataset = vec![
            Sample::new("/a/2.wav", "ok"),
            Sample::new("/a/99.wav", "too long input"),
            Sample::new("/a/2.wav", "BAD LABEL"),
            Sample::new("/a/2.wav", "this is too long"),
            Sample::new("/a/5.wav", "fine"),
        ];

        let batch = assembler(2).assemble(&dataset, 3).unwrap();

        assert_eq!(batch.target_lengths, vec![5, 3]);
        assert_eq!(batch.next_pointer, 1);
    }

    #[test]
    fn test_no_usable_samples() {
        let dataset = vec![Sample::new("/a/2.wav", "NOPE"), Sample::new("/a/x.wav", "ok")];
        assert!(matches!(
            assembler(1).assemble(&dataset, 0),
            Err(PrepError::NoUsableSamples(_))
        ));
        assert!(matches!(
            assembler(1).assemble(&[], 0),
            Err(PrepError::NoUsableSamples(_))
        ));
    }

    #[test]
    fn test_num_batches_is_floor() {
        let spec = assembler(4).spec();
        assert_eq!(spec.num_batches(11), 2);
        assert_eq!(spec.num_batches(3), 0);
    }
}
