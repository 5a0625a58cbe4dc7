//! Run preparation
//!
//! Ties the startup steps together: checkpoint resolution first (it may replace the
//! configured parameters), then ingestion of the train corpus and the test corpus.
//! Without test corpus roots the test set is carved off the train set by `train_frac`.

use crate::models::Sample;
use crate::services::checkpoint_manager::{CheckpointLifecycleManager, CheckpointState};
use crate::services::corpus_ingestor::{CorpusIngestor, IngestOptions};
use crate::services::dataset_split::split_by_fraction;
use crate::PrepResult;
use asr_common::params::HyperParams;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Cache for the train corpus file list
    pub file_cache: Option<PathBuf>,
    /// Cache for the test corpus file list
    pub test_file_cache: Option<PathBuf>,
    pub size_ordering: bool,
}

/// Everything a training run needs before the first step
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub params: HyperParams,
    pub checkpoint_state: CheckpointState,
    pub train_set: Vec<Sample>,
    pub test_set: Vec<Sample>,
}

/// Resolve the checkpoint lineage and ingest both data sets
pub fn prepare_run(
    params: HyperParams,
    ingestor: &CorpusIngestor,
    options: &SetupOptions,
) -> PrepResult<PreparedRun> {
    let resolution = CheckpointLifecycleManager::new().resolve(params)?;
    let params = resolution.params;

    let train_options = IngestOptions {
        size_ordering: options.size_ordering,
        file_cache: options.file_cache.clone(),
    };
    let train_set = ingestor.run(params.training_dataset_dirs.as_slice(), &train_options)?;

    let (train_set, test_set) = match (&params.test_dataset_dirs, params.train_frac) {
        (Some(test_dirs), _) => {
            let test_options = IngestOptions {
                size_ordering: options.size_ordering,
                file_cache: options.test_file_cache.clone(),
            };
            let test_set = ingestor.run(test_dirs.as_slice(), &test_options)?;
            (train_set, test_set)
        }
        (None, Some(frac)) => split_by_fraction(train_set, frac),
        (None, None) => {
            warn!("No test_dataset_dirs or train_frac configured, running without a test set");
            (train_set, Vec::new())
        }
    };

    info!(
        state = ?resolution.state,
        checkpoint_dir = %params.checkpoint_dir.display(),
        train = train_set.len(),
        test = test_set.len(),
        "Run prepared"
    );

    Ok(PreparedRun {
        params,
        checkpoint_state: resolution.state,
        train_set,
        test_set,
    })
}
