//! Training configuration loading
//!
//! Reads the sectioned TOML configuration into a [`HyperParams`]:
//!
//! ```toml
//! [acoustic_network_params]
//! num_layers = 2
//! hidden_size = 256
//! dropout = 0.5
//! batch_size = 16
//! learning_rate = 3e-4
//! lr_decay_factor = 0.9
//! grad_clip = 5
//!
//! [general]
//! use_config_file_if_checkpoint_exists = true
//! steps_per_checkpoint = 100
//! checkpoint_dir = "checkpoints"
//!
//! [training]
//! training_dataset_dirs = ["data/LibriSpeech/train-clean-100", "data/TEDLIUM_release2/train"]
//! max_input_seq_length = 3510
//! max_target_seq_length = 600
//!
//! [logging]
//! log_level = "INFO"
//! ```
//!
//! Optional keys fall back to: `test_dataset_dirs`, `train_frac`, `tensorboard_dir`,
//! `log_file` → none, `log_level` → `WARNING`.

use crate::logging::LogLevel;
use crate::params::{DatasetDirs, HyperParams};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Raw configuration file, one struct per section
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub acoustic_network_params: AcousticNetworkSection,
    pub general: GeneralSection,
    pub training: TrainingSection,
    /// Whole section may be omitted
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcousticNetworkSection {
    pub num_layers: u32,
    pub hidden_size: u32,
    pub dropout: f64,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub lr_decay_factor: f64,
    pub grad_clip: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSection {
    pub use_config_file_if_checkpoint_exists: bool,
    pub steps_per_checkpoint: usize,
    pub checkpoint_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingSection {
    pub training_dataset_dirs: DatasetDirs,
    #[serde(default)]
    pub test_dataset_dirs: Option<DatasetDirs>,
    #[serde(default)]
    pub train_frac: Option<f64>,
    pub max_input_seq_length: usize,
    pub max_target_seq_length: usize,
    #[serde(default)]
    pub tensorboard_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSection {
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Kept as text so an unknown name is reported as a configuration error
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Load hyperparameters from a TOML configuration file
pub fn load_hyper_params(path: &Path) -> Result<HyperParams> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    let params = parse_hyper_params(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    debug!(config = %path.display(), "Loaded hyper params: {:?}", params);
    Ok(params)
}

/// Parse hyperparameters from TOML text
pub fn parse_hyper_params(content: &str) -> Result<HyperParams> {
    let config: TomlConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
    config.into_hyper_params()
}

impl TomlConfig {
    /// Validate and flatten the sections
    pub fn into_hyper_params(self) -> Result<HyperParams> {
        let TomlConfig {
            acoustic_network_params: net,
            general,
            training,
            logging,
        } = self;

        if training.training_dataset_dirs.is_empty() {
            return Err(Error::Config(
                "training.training_dataset_dirs must name at least one directory".to_string(),
            ));
        }

        if let Some(frac) = training.train_frac {
            if !(0.0..=1.0).contains(&frac) {
                return Err(Error::Config(format!(
                    "training.train_frac must be within [0, 1], got {}",
                    frac
                )));
            }
        }

        let tensorboard_dir = match training.tensorboard_dir {
            Some(dir) if dir.exists() => Some(dir),
            Some(dir) => {
                warn!(
                    tensorboard_dir = %dir.display(),
                    "Tensorboard directory does not exist, summaries disabled"
                );
                None
            }
            None => None,
        };

        let log_level = match logging.log_level.as_deref() {
            Some(name) => name.parse::<LogLevel>()?,
            None => LogLevel::default(),
        };

        Ok(HyperParams {
            num_layers: net.num_layers,
            hidden_size: net.hidden_size,
            dropout: net.dropout,
            batch_size: net.batch_size,
            learning_rate: net.learning_rate,
            lr_decay_factor: net.lr_decay_factor,
            grad_clip: net.grad_clip,
            use_config_file_if_checkpoint_exists: general.use_config_file_if_checkpoint_exists,
            steps_per_checkpoint: general.steps_per_checkpoint,
            checkpoint_dir: general.checkpoint_dir,
            training_dataset_dirs: training.training_dataset_dirs,
            test_dataset_dirs: training.test_dataset_dirs.filter(|dirs| !dirs.is_empty()),
            train_frac: training.train_frac,
            max_input_seq_length: training.max_input_seq_length,
            max_target_seq_length: training.max_target_seq_length,
            tensorboard_dir,
            log_file: logging.log_file,
            log_level,
        })
    }
}
