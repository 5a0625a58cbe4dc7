//! Command-line arguments for asr-prep

use crate::services::SetupOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "asr-prep")]
#[command(about = "Speech corpus preparation and checkpoint setup for acoustic model training")]
#[command(version)]
pub struct Cli {
    /// Hyperparameter configuration file (TOML)
    #[arg(short, long, default_value = "config.toml", env = "ASR_PREP_CONFIG")]
    pub config: PathBuf,

    /// Cache of the train corpus file list
    #[arg(long)]
    pub file_cache: Option<PathBuf>,

    /// Cache of the test corpus file list
    #[arg(long)]
    pub test_file_cache: Option<PathBuf>,

    /// Order samples by duration, shortest first, instead of shuffling
    #[arg(long)]
    pub size_ordering: bool,

    /// sox binary used to carve TEDLIUM segments
    #[arg(long, default_value = "sox", env = "ASR_PREP_SOX")]
    pub sox: PathBuf,
}

impl Cli {
    pub fn setup_options(&self) -> SetupOptions {
        SetupOptions {
            file_cache: self.file_cache.clone(),
            test_file_cache: self.test_file_cache.clone(),
            size_ordering: self.size_ordering,
        }
    }
}
