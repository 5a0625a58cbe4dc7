//! Shared test helpers for asr-prep integration tests

#![allow(dead_code)]

pub mod corpus;
pub mod log_capture;

use asr_common::logging::LogLevel;
use asr_common::params::{DatasetDirs, HyperParams};
use std::path::{Path, PathBuf};

/// Parameters with a small architecture, rooted at `checkpoint_dir`
pub fn test_params(checkpoint_dir: &Path, training_dirs: Vec<PathBuf>) -> HyperParams {
    HyperParams {
        num_layers: 2,
        hidden_size: 128,
        dropout: 0.5,
        batch_size: 4,
        learning_rate: 1e-3,
        lr_decay_factor: 0.9,
        grad_clip: 1,
        use_config_file_if_checkpoint_exists: true,
        steps_per_checkpoint: 100,
        checkpoint_dir: checkpoint_dir.to_path_buf(),
        training_dataset_dirs: DatasetDirs::new(training_dirs),
        test_dataset_dirs: None,
        train_frac: None,
        max_input_seq_length: 1000,
        max_target_seq_length: 200,
        tensorboard_dir: None,
        log_file: None,
        log_level: LogLevel::Warning,
    }
}
