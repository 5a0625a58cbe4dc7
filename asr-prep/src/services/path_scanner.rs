//! Recursive file discovery by name suffix
//!
//! Walks a corpus root and returns every file whose name ends with a given suffix.
//! Never fails: a missing root and unreadable entries are logged and skipped. Symlinked
//! directories are not entered; symlinks to files are returned, one entry per link even
//! when several share a target. Entries are visited in file-name order within each
//! directory so that parser output is reproducible across runs.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Suffix-matching directory walker
#[derive(Debug, Clone)]
pub struct PathScanner;

impl PathScanner {
    pub fn new() -> Self {
        Self
    }

    /// All files under `root` whose name ends with `suffix`
    pub fn find(&self, root: &Path, suffix: &str) -> Vec<PathBuf> {
        let mut found = Vec::new();
        self.walk(root, suffix, |path| {
            found.push(path);
            true
        });

        tracing::debug!(
            root = %root.display(),
            suffix,
            count = found.len(),
            "Scan complete"
        );
        found
    }

    /// True if at least one file under `root` ends with `suffix`
    ///
    /// Stops at the first match.
    pub fn contains_any(&self, root: &Path, suffix: &str) -> bool {
        let mut hit = false;
        self.walk(root, suffix, |_| {
            hit = true;
            false
        });
        hit
    }

    /// Visit matching files until `visit` returns false
    fn walk<F>(&self, root: &Path, suffix: &str, mut visit: F)
    where
        F: FnMut(PathBuf) -> bool,
    {
        if !root.exists() {
            tracing::debug!(root = %root.display(), "Scan root does not exist");
            return;
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !Self::is_file(&entry) {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(suffix) {
                continue;
            }
            if !visit(entry.into_path()) {
                return;
            }
        }
    }

    /// Plain files, and symlinks that resolve to files
    fn is_file(entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
    }
}

impl Default for PathScanner {
    fn default() -> Self {
        Self::new()
    }
}
