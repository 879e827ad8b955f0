//! Scanner module for directory traversal and content fingerprinting.
//!
//! The scanner is divided into submodules:
//! - [`walker`]: directory traversal and eligible-file discovery
//! - [`hasher`]: streaming XxHash64 content fingerprints
//!
//! # Symlink policy
//!
//! Symbolic links are never followed and never treated as eligible files.
//! This avoids traversal cycles and keeps repeated runs stable: a duplicate
//! that was replaced by a symbolic link on a previous run is simply skipped
//! on the next one.
//!
//! # Example
//!
//! ```no_run
//! use dupelink::scanner::{ExtensionFilter, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("./publish"), ExtensionFilter::default());
//! let files = walker.collect_files().expect("root must exist");
//! for file in &files {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{Fingerprint, Hasher};
pub use walker::Walker;

/// Metadata for a discovered eligible file.
///
/// Created once per file during scanning and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Number of path segments below the scan root
    pub depth: usize,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, depth: usize) -> Self {
        Self { path, size, depth }
    }
}

/// Case-insensitive extension allow-list for eligible files.
///
/// Stored extensions are normalized to lowercase without a leading dot.
/// A file with no extension never matches.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    allowed: Vec<String>,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(["dll", "exe"])
    }
}

impl ExtensionFilter {
    /// Create a filter from a list of extensions.
    ///
    /// Leading dots are stripped and comparison is case-insensitive, so
    /// `".DLL"` and `"dll"` are the same entry. Empty entries are dropped.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { allowed }
    }

    /// Check whether a path's extension is on the allow-list.
    #[must_use]
    pub fn matches(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(std::ffi::OsStr::to_str)
            .is_some_and(|ext| self.allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
    }

    /// The normalized extensions in this filter.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.allowed
    }
}

/// Errors that can occur during directory scanning.
///
/// A missing or invalid root is the only fatal condition in the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root was not found.
    #[error("directory not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while resolving the scan root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (may have been removed mid-run).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Map an I/O error for `path` to the matching variant.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
