//! asr-prep - Main entry point
//!
//! Loads the hyperparameters, resolves the checkpoint lineage and ingests the train and
//! test corpora, then reports what a training run would start from.

use anyhow::{Context, Result};
use asr_common::config::load_hyper_params;
use asr_common::logging::init_logging;
use asr_prep::audio::{SoxSegmentExtractor, SymphoniaDurationProvider};
use asr_prep::cli::Cli;
use asr_prep::services::{prepare_run, BatchSpec, CorpusIngestor};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let params = load_hyper_params(&cli.config)
        .with_context(|| format!("Failed to load configuration: {}", cli.config.display()))?;

    init_logging(params.log_level, params.log_file.as_deref())
        .context("Failed to initialize logging")?;

    info!(config = %cli.config.display(), "Starting asr-prep v{}", env!("CARGO_PKG_VERSION"));

    let ingestor = CorpusIngestor::new(Arc::new(SoxSegmentExtractor::new(cli.sox.clone())))
        .with_duration_provider(Arc::new(SymphoniaDurationProvider::new()));
    let options = cli.setup_options();

    let run = tokio::task::spawn_blocking(move || prepare_run(params, &ingestor, &options))
        .await
        .context("Preparation task failed")?
        .context("Failed to prepare training run")?;

    let spec = BatchSpec::from_params(&run.params);
    info!(
        state = ?run.checkpoint_state,
        checkpoint_dir = %run.params.checkpoint_dir.display(),
        train_samples = run.train_set.len(),
        train_batches = spec.num_batches(run.train_set.len()),
        test_samples = run.test_set.len(),
        test_batches = spec.num_batches(run.test_set.len()),
        "Training data ready"
    );
    println!(
        "{} train / {} test samples, checkpoints in {}",
        run.train_set.len(),
        run.test_set.len(),
        run.params.checkpoint_dir.display()
    );

    Ok(())
}
