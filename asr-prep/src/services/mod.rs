//! Preparation services

pub mod batch_assembler;
pub mod batch_prefetcher;
pub mod checkpoint_manager;
pub mod corpus_ingestor;
pub mod dataset_split;
pub mod file_list_cache;
pub mod format_detector;
pub mod label_encoder;
pub mod label_normalizer;
pub mod parsers;
pub mod path_scanner;
pub mod training_driver;
pub mod training_setup;

pub use batch_assembler::{BatchAssembler, BatchSpec};
pub use batch_prefetcher::{BatchPrefetcher, Split};
pub use checkpoint_manager::{CheckpointLifecycleManager, CheckpointResolution, CheckpointState};
pub use corpus_ingestor::{CorpusIngestor, IngestOptions};
pub use training_driver::{TrainingDriver, TrainingSummary};
pub use training_setup::{prepare_run, PreparedRun, SetupOptions};
