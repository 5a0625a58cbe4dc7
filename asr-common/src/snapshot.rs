//! Hyperparameter snapshot persistence
//!
//! Each checkpoint directory holds at most one `hyperparams.json`. Reads are strict:
//! a file that is missing, empty, unreadable, or lacks any field counts as "no
//! snapshot" rather than a partial match.

use crate::params::HyperParams;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the snapshot inside a checkpoint directory
pub const SNAPSHOT_FILENAME: &str = "hyperparams.json";

pub fn snapshot_path(checkpoint_dir: &Path) -> PathBuf {
    checkpoint_dir.join(SNAPSHOT_FILENAME)
}

/// Read the snapshot stored in `checkpoint_dir`, if there is a usable one
pub fn load_snapshot(checkpoint_dir: &Path) -> Option<HyperParams> {
    let path = snapshot_path(checkpoint_dir);
    if !path.exists() {
        debug!(path = %path.display(), "No hyper params snapshot");
        return None;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), "Cannot read hyper params snapshot: {}", e);
            return None;
        }
    };
    if content.trim().is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), "Ignoring malformed hyper params snapshot: {}", e);
            return None;
        }
    };

    // serde would quietly default absent Option fields, so check presence first
    let object = value.as_object()?;
    if let Some(missing) = HyperParams::FIELD_NAMES
        .iter()
        .find(|name| !object.contains_key(**name))
    {
        warn!(
            path = %path.display(),
            field = *missing,
            "Ignoring incomplete hyper params snapshot"
        );
        return None;
    }

    match serde_json::from_value(value) {
        Ok(params) => Some(params),
        Err(e) => {
            warn!(path = %path.display(), "Ignoring malformed hyper params snapshot: {}", e);
            None
        }
    }
}

/// Write `params` as the snapshot of `checkpoint_dir`, replacing any previous one
pub fn save_snapshot(checkpoint_dir: &Path, params: &HyperParams) -> Result<()> {
    let path = snapshot_path(checkpoint_dir);
    let json = serde_json::to_string_pretty(params)?;

    // Replace atomically
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, &path)?;

    debug!(path = %path.display(), "Saved hyper params snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::params::DatasetDirs;
    use tempfile::TempDir;

    fn params_for(dir: &Path) -> HyperParams {
        HyperParams {
            num_layers: 3,
            hidden_size: 512,
            dropout: 0.2,
            batch_size: 32,
            learning_rate: 1e-3,
            lr_decay_factor: 0.95,
            grad_clip: 10,
            use_config_file_if_checkpoint_exists: false,
            steps_per_checkpoint: 200,
            checkpoint_dir: dir.to_path_buf(),
            training_dataset_dirs: DatasetDirs::from_list_str("/data/train"),
            test_dataset_dirs: Some(DatasetDirs::from_list_str("/data/test")),
            train_frac: Some(0.9),
            max_input_seq_length: 1000,
            max_target_seq_length: 200,
            tensorboard_dir: None,
            log_file: None,
            log_level: LogLevel::Info,
        }
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_snapshot(temp_dir.path()).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let params = params_for(temp_dir.path());

        save_snapshot(temp_dir.path(), &params).unwrap();

        assert_eq!(load_snapshot(temp_dir.path()), Some(params));
        assert!(!temp_dir.path().join("hyperparams.json.tmp").exists());
    }

    #[test]
    fn test_empty_snapshot_is_none() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(snapshot_path(temp_dir.path()), "").unwrap();
        assert!(load_snapshot(temp_dir.path()).is_none());
    }

    #[test]
    fn test_snapshot_missing_optional_field_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let mut value = serde_json::to_value(params_for(temp_dir.path())).unwrap();
        value.as_object_mut().unwrap().remove("train_frac");
        std::fs::write(snapshot_path(temp_dir.path()), value.to_string()).unwrap();

        assert!(load_snapshot(temp_dir.path()).is_none());
    }

    #[test]
    fn test_garbage_snapshot_is_none() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(snapshot_path(temp_dir.path()), b"\x80\x03}q\x00").unwrap();
        assert!(load_snapshot(temp_dir.path()).is_none());
    }
}
