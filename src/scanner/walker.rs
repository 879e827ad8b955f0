//! Directory walker for eligible-file discovery.
//!
//! # Overview
//!
//! [`Walker`] traverses a root directory recursively with `walkdir` and
//! collects a [`FileRecord`] for every regular file whose extension is on
//! the allow-list. Traversal is read-only and strictly sequential.
//!
//! Symbolic links are never followed (directory symlinks could otherwise
//! form cycles) and symlinked files are never eligible. Unreadable entries
//! below the root are logged and skipped; only a missing or invalid root
//! aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ExtensionFilter, FileRecord, ScanError};

/// Recursive directory walker with an extension allow-list.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Eligibility filter
    filter: ExtensionFilter,
}

impl Walker {
    /// Create a walker for `root`.
    #[must_use]
    pub fn new(root: &Path, filter: ExtensionFilter) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
        }
    }

    /// Walk the tree and collect all eligible files.
    ///
    /// Paths in the returned records are absolute. `depth` counts path
    /// segments below the scan root (a file directly under the root has
    /// depth 1).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if the root does not exist and
    /// [`ScanError::NotADirectory`] if it is not a directory. Both are
    /// fatal for the run.
    pub fn collect_files(&self) -> Result<Vec<FileRecord>, ScanError> {
        let root = self.resolve_root()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            // file_type() reports the symlink itself when links are not
            // followed, so symlinks fail the is_file() check here.
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.filter.matches(entry.path()) {
                log::trace!("Filtered out {}", entry.path().display());
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            files.push(FileRecord::new(
                entry.path().to_path_buf(),
                metadata.len(),
                entry.depth(),
            ));
        }

        log::info!(
            "Found {} eligible file(s) under {}",
            files.len(),
            root.display()
        );
        Ok(files)
    }

    /// Canonicalize the root and verify it is a directory.
    fn resolve_root(&self) -> Result<PathBuf, ScanError> {
        let root = match self.root.canonicalize() {
            Ok(root) => root,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::NotFound(self.root.clone()));
            }
            Err(err) => {
                return Err(ScanError::Io {
                    path: self.root.clone(),
                    source: err,
                });
            }
        };

        let metadata = fs::metadata(&root).map_err(|source| ScanError::Io {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        Ok(root)
    }
}
