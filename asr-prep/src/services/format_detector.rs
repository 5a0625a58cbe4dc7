//! Corpus layout detection
//!
//! Probes a root for each layout's marker file in fixed priority order:
//! `.trn` → Vystadial 2013, `.stm` → TEDLIUM, `index.tags.txt` → Shtooka,
//! `.trans.txt` → LibriSpeech. A root holding markers of several layouts is
//! classified by the first match, so a mixed `.trn` + `.stm` tree reads as
//! Vystadial 2013.

use crate::models::CorpusFormat;
use crate::services::path_scanner::PathScanner;
use std::path::Path;

/// Classifies corpus roots by marker files
#[derive(Debug, Clone, Default)]
pub struct FormatDetector {
    scanner: PathScanner,
}

impl FormatDetector {
    pub fn new(scanner: PathScanner) -> Self {
        Self { scanner }
    }

    /// Layout of `root`, or `None` when no marker file is present
    pub fn classify(&self, root: &Path) -> Option<CorpusFormat> {
        let detected = CorpusFormat::DETECTION_ORDER
            .into_iter()
            .find(|format| self.scanner.contains_any(root, format.marker_suffix()));

        match detected {
            Some(format) => tracing::debug!(root = %root.display(), %format, "Detected corpus layout"),
            None => tracing::debug!(root = %root.display(), "Unrecognized corpus layout"),
        }
        detected
    }
}
