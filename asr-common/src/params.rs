//! Hyperparameter model
//!
//! A flat set of named training parameters. Three of them (layer count, hidden size,
//! dropout) change the shape of persisted weights and decide whether an existing
//! checkpoint lineage can be resumed; the rest only affect the training process.

use crate::logging::LogLevel;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Ordered list of corpus root directories
///
/// Order is significant: it is part of the file-list cache identity.
/// Accepts either a TOML/JSON array or a single comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DatasetDirs(Vec<PathBuf>);

impl DatasetDirs {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self(dirs)
    }

    /// Parse a comma-separated list, trimming entries and dropping empty ones
    pub fn from_list_str(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(PathBuf::from)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for DatasetDirs {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawDirs {
            List(Vec<PathBuf>),
            Joined(String),
        }

        Ok(match RawDirs::deserialize(deserializer)? {
            RawDirs::List(dirs) => DatasetDirs(dirs),
            RawDirs::Joined(joined) => DatasetDirs::from_list_str(&joined),
        })
    }
}

/// Fields that change the shape of persisted weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub num_layers: u32,
    pub hidden_size: u32,
    pub dropout: f64,
}

/// Complete hyperparameter set for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    // === Acoustic network ===
    pub num_layers: u32,
    pub hidden_size: u32,
    pub dropout: f64,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub lr_decay_factor: f64,
    pub grad_clip: u32,

    // === General ===
    pub use_config_file_if_checkpoint_exists: bool,
    pub steps_per_checkpoint: usize,
    pub checkpoint_dir: PathBuf,

    // === Training ===
    pub training_dataset_dirs: DatasetDirs,
    pub test_dataset_dirs: Option<DatasetDirs>,
    pub train_frac: Option<f64>,
    pub max_input_seq_length: usize,
    pub max_target_seq_length: usize,
    pub tensorboard_dir: Option<PathBuf>,

    // === Logging ===
    pub log_file: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl HyperParams {
    /// Every field name of the persisted record
    ///
    /// Snapshot reads require all of them to be present (null is allowed for optional ones).
    pub const FIELD_NAMES: [&'static str; 18] = [
        "num_layers",
        "hidden_size",
        "dropout",
        "batch_size",
        "learning_rate",
        "lr_decay_factor",
        "grad_clip",
        "use_config_file_if_checkpoint_exists",
        "steps_per_checkpoint",
        "checkpoint_dir",
        "training_dataset_dirs",
        "test_dataset_dirs",
        "train_frac",
        "max_input_seq_length",
        "max_target_seq_length",
        "tensorboard_dir",
        "log_file",
        "log_level",
    ];

    pub fn architecture(&self) -> Architecture {
        Architecture {
            num_layers: self.num_layers,
            hidden_size: self.hidden_size,
            dropout: self.dropout,
        }
    }

    /// True if a checkpoint written with `other` can be resumed with `self`
    ///
    /// Only layer count, hidden size and dropout take part. Learning rate, batch size
    /// and paths may differ freely.
    pub fn is_compatible_with(&self, other: &HyperParams) -> bool {
        self.architecture() == other.architecture()
    }
}
