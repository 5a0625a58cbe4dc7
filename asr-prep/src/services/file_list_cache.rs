//! Persisted sample list keyed by the ordered corpus root set
//!
//! A cache file holds exactly one record `{roots, samples}`. It is only valid for a
//! run whose roots are identical, element by element and in the same order. Unreadable
//! or mismatching files are treated as a miss, never as an error.

use crate::models::Sample;
use crate::PrepResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    roots: Vec<PathBuf>,
    samples: Vec<Sample>,
}

/// Cache file location
#[derive(Debug, Clone)]
pub struct FileListCache {
    path: PathBuf,
}

impl FileListCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Samples stored for exactly `roots`, if any
    pub fn load(&self, roots: &[PathBuf]) -> Option<Vec<Sample>> {
        if !self.path.exists() {
            return None;
        }

        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(cache = %self.path.display(), "Cannot read file list cache: {}", e);
                return None;
            }
        };
        let record: CacheRecord = match serde_json::from_slice(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(cache = %self.path.display(), "Ignoring unreadable file list cache: {}", e);
                return None;
            }
        };

        if record.roots != roots {
            tracing::info!(
                cache = %self.path.display(),
                "File list cache was built from different directories, rescanning"
            );
            return None;
        }
        Some(record.samples)
    }

    /// Replace the cache content with `{roots, samples}`
    pub fn save(&self, roots: &[PathBuf], samples: &[Sample]) -> PrepResult<()> {
        let record = CacheRecord {
            roots: roots.to_vec(),
            samples: samples.to_vec(),
        };
        let json = serde_json::to_vec(&record).map_err(asr_common::Error::from)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
