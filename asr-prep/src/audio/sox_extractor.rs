//! Segment extraction through the `sox` command-line tool
//!
//! Runs `sox <source> <destination> trim <start> =<end>` once per segment. The tool
//! picks the output format from the destination extension.

use crate::types::{ExtractOutcome, SegmentExtractor};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SoxSegmentExtractor {
    binary: PathBuf,
}

impl SoxSegmentExtractor {
    /// Extractor invoking `binary` (a path or a name looked up on `PATH`)
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments passed after the binary name; paths are passed through unconverted
    pub fn arguments(source: &Path, destination: &Path, start: f64, end: f64) -> Vec<OsString> {
        vec![
            source.as_os_str().to_owned(),
            destination.as_os_str().to_owned(),
            OsString::from("trim"),
            OsString::from(start.to_string()),
            OsString::from(format!("={}", end)),
        ]
    }
}

impl Default for SoxSegmentExtractor {
    fn default() -> Self {
        Self::new("sox")
    }
}

impl SegmentExtractor for SoxSegmentExtractor {
    fn extract_segment(
        &self,
        source: &Path,
        destination: &Path,
        start: f64,
        end: f64,
    ) -> ExtractOutcome {
        if destination.exists() {
            return ExtractOutcome::AlreadyExists;
        }

        debug!(
            source = %source.display(),
            destination = %destination.display(),
            start,
            end,
            "Extracting segment"
        );

        match Command::new(&self.binary)
            .args(Self::arguments(source, destination, start, end))
            .output()
        {
            Ok(output) if output.status.success() => ExtractOutcome::Extracted,
            Ok(output) => {
                warn!(
                    source = %source.display(),
                    code = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "sox failed to extract segment"
                );
                ExtractOutcome::Failed
            }
            Err(e) => {
                warn!(binary = %self.binary.display(), "Failed to run sox: {}", e);
                ExtractOutcome::Failed
            }
        }
    }
}
