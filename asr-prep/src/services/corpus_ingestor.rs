//! Corpus ingestion
//!
//! Turns an ordered list of corpus roots into one sample list:
//!
//! **Algorithm:**
//! 1. If a file list cache is configured and was built from the same roots in the same
//!    order, return its samples without scanning
//! 2. Otherwise classify each root, dispatch to its layout parser and concatenate the
//!    results (root order, then parser order)
//! 3. Fail if a root has no recognizable layout, or if nothing was found at all
//! 4. With size ordering, fill in missing durations and stable-sort shortest first;
//!    otherwise shuffle
//! 5. Persist the result to the cache, if configured

use crate::models::Sample;
use crate::services::file_list_cache::FileListCache;
use crate::services::format_detector::FormatDetector;
use crate::services::parsers::{ParseContext, ParserTable};
use crate::services::path_scanner::PathScanner;
use crate::types::{DurationProvider, SegmentExtractor};
use crate::{PrepError, PrepResult};
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-run ingestion options
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Sort by duration instead of shuffling
    pub size_ordering: bool,
    /// Location of the file list cache
    pub file_cache: Option<PathBuf>,
}

/// Discovers, parses, orders and caches corpus samples
pub struct CorpusIngestor {
    scanner: PathScanner,
    detector: FormatDetector,
    parsers: ParserTable,
    extractor: Arc<dyn SegmentExtractor>,
    duration_provider: Option<Arc<dyn DurationProvider>>,
}

impl CorpusIngestor {
    /// Ingestor with the standard parsers; `extractor` carves TEDLIUM segments
    pub fn new(extractor: Arc<dyn SegmentExtractor>) -> Self {
        let scanner = PathScanner::new();
        Self {
            detector: FormatDetector::new(scanner.clone()),
            scanner,
            parsers: ParserTable::standard(),
            extractor,
            duration_provider: None,
        }
    }

    /// Source of durations for size ordering
    pub fn with_duration_provider(mut self, provider: Arc<dyn DurationProvider>) -> Self {
        self.duration_provider = Some(provider);
        self
    }

    pub fn with_parsers(mut self, parsers: ParserTable) -> Self {
        self.parsers = parsers;
        self
    }

    /// Produce the ordered sample list for `roots`
    pub fn run(&self, roots: &[PathBuf], options: &IngestOptions) -> PrepResult<Vec<Sample>> {
        let cache = options.file_cache.as_ref().map(FileListCache::new);

        if let Some(cache) = &cache {
            if let Some(samples) = cache.load(roots) {
                info!(
                    cache = %cache.path().display(),
                    count = samples.len(),
                    "Using audio files list from cache file"
                );
                return Ok(samples);
            }
        }

        let mut samples = self.collect(roots)?;

        if options.size_ordering {
            self.fill_durations(&mut samples);
            debug!("Sorting the audio files list by duration");
            samples.sort_by(|a, b| compare_durations(a.duration, b.duration));
        } else {
            debug!("Shuffling the audio files list");
            samples.shuffle(&mut rand::thread_rng());
        }

        if let Some(cache) = &cache {
            info!(cache = %cache.path().display(), "Saving audio files list to cache file");
            if let Err(e) = cache.save(roots, &samples) {
                warn!(cache = %cache.path().display(), "Failed to save file list cache: {}", e);
            }
        }

        Ok(samples)
    }

    /// Classify and parse every root, in order
    fn collect(&self, roots: &[PathBuf]) -> PrepResult<Vec<Sample>> {
        let ctx = ParseContext {
            scanner: &self.scanner,
            extractor: self.extractor.as_ref(),
        };

        let mut samples = Vec::new();
        for root in roots {
            let format = self
                .detector
                .classify(root)
                .ok_or_else(|| PrepError::UnknownFormat(root.clone()))?;
            info!(root = %root.display(), %format, "Reading corpus");
            samples.extend(self.parsers.parser_for(format).parse(root, &ctx));
        }

        if samples.is_empty() {
            return Err(PrepError::EmptyCorpus {
                roots: roots.to_vec(),
            });
        }
        Ok(samples)
    }

    /// Best-effort duration pass with whole-percent progress logging
    fn fill_durations(&self, samples: &mut [Sample]) {
        let Some(provider) = &self.duration_provider else {
            warn!("Size ordering requested without a duration provider, order left unchanged");
            return;
        };

        let total = samples.len();
        info!(
            "Getting audio files duration, this could take long ({} files to process)",
            total
        );

        let mut previous_percent = 0;
        for (index, sample) in samples.iter_mut().enumerate() {
            if sample.duration.is_none() {
                match provider.duration_seconds(&sample.audio_path) {
                    Ok(duration) => sample.duration = Some(duration),
                    Err(e) => warn!(
                        path = %sample.audio_path.display(),
                        "Cannot get audio duration: {}",
                        e
                    ),
                }
            }

            let percent = ((index as f64 / total as f64) * 100.0).round() as u32;
            if percent != previous_percent {
                info!("{} % done", percent);
                previous_percent = percent;
            }
        }
    }
}

/// Ascending duration; samples without one go last
fn compare_durations(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
