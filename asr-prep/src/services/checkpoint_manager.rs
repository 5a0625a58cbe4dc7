//! Checkpoint lineage lifecycle
//!
//! Decides, once at startup, which checkpoint directory a run writes to and which
//! hyperparameters it uses:
//!
//! | Snapshot in `checkpoint_dir` | Compatible | `use_config_file_if_checkpoint_exists` | Outcome |
//! |---|---|---|---|
//! | none | - | - | `NoCheckpoint`: snapshot the fresh params, use them |
//! | present | yes | - | `CompatibleResume`: fresh params, same directory |
//! | present | no | false | `IncompatibleOverwrite`: persisted params replace the fresh ones |
//! | present | no | true | `IncompatibleBranch`: new child lineage with the fresh params |
//!
//! Compatibility compares layer count, hidden size and dropout only. Existing lineages
//! are never deleted. Concurrent runs against one checkpoint root are not supported.

use crate::PrepResult;
use asr_common::params::HyperParams;
use asr_common::snapshot::{load_snapshot, save_snapshot};
use std::path::Path;
use tracing::{debug, info, warn};

/// Startup decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointState {
    NoCheckpoint,
    CompatibleResume,
    IncompatibleBranch,
    IncompatibleOverwrite,
}

/// Effective parameters for the run
#[derive(Debug, Clone)]
pub struct CheckpointResolution {
    pub state: CheckpointState,
    /// Parameters to train with; `checkpoint_dir` is the effective lineage directory
    pub params: HyperParams,
}

impl CheckpointResolution {
    pub fn checkpoint_dir(&self) -> &Path {
        &self.params.checkpoint_dir
    }
}

/// Name of a branched lineage directory
pub fn branch_dir_name(unix_timestamp: i64, params: &HyperParams) -> String {
    format!(
        "{}_hidden_size_{}_numlayers_{}_dropout_{:?}",
        unix_timestamp, params.hidden_size, params.num_layers, params.dropout
    )
}

/// Reconciles fresh configuration with persisted checkpoint state
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckpointLifecycleManager;

impl CheckpointLifecycleManager {
    pub fn new() -> Self {
        Self
    }

    /// Resolve using the current wall-clock time for branch names
    pub fn resolve(&self, params: HyperParams) -> PrepResult<CheckpointResolution> {
        self.resolve_at(params, chrono::Utc::now().timestamp())
    }

    /// Resolve with an explicit timestamp for branch names
    pub fn resolve_at(
        &self,
        params: HyperParams,
        unix_timestamp: i64,
    ) -> PrepResult<CheckpointResolution> {
        let root = params.checkpoint_dir.clone();
        info!(checkpoint_dir = %root.display(), "Using checkpoint");
        std::fs::create_dir_all(&root)?;

        let Some(persisted) = load_snapshot(&root) else {
            save_snapshot(&root, &params)?;
            info!("No hyper params detected at checkpoint, reading config file");
            return Ok(CheckpointResolution {
                state: CheckpointState::NoCheckpoint,
                params,
            });
        };

        if params.is_compatible_with(&persisted) {
            info!("No hyper parameter change detected, using old checkpoint");
            return Ok(CheckpointResolution {
                state: CheckpointState::CompatibleResume,
                params,
            });
        }

        debug!(
            persisted = ?persisted.architecture(),
            configured = ?params.architecture(),
            "Architecture differs from checkpoint"
        );

        if !params.use_config_file_if_checkpoint_exists {
            warn!(
                checkpoint_dir = %root.display(),
                "Restoring hyper params from previous checkpoint; configured values are ignored"
            );
            let mut restored = persisted;
            // The lineage lives where its snapshot was found
            restored.checkpoint_dir = root;
            return Ok(CheckpointResolution {
                state: CheckpointState::IncompatibleOverwrite,
                params: restored,
            });
        }

        let branch = root.join(branch_dir_name(unix_timestamp, &params));
        std::fs::create_dir_all(&branch)?;
        let mut params = params;
        params.checkpoint_dir = branch;
        save_snapshot(&params.checkpoint_dir, &params)?;
        info!(
            checkpoint_dir = %params.checkpoint_dir.display(),
            "Hyper parameters changed, starting a new checkpoint lineage"
        );

        Ok(CheckpointResolution {
            state: CheckpointState::IncompatibleBranch,
            params,
        })
    }
}
