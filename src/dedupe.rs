//! Deduplication pipeline orchestration.
//!
//! # Overview
//!
//! [`Deduplicator`] runs the strictly sequential pipeline:
//!
//! 1. Scan the root for eligible files
//! 2. Fingerprint and group them by content
//! 3. Pick a master per group and replace the rest with links
//!
//! Grouping completes for the whole tree before any linking begins, so
//! master selection never depends on hashing completion order. All counts
//! and per-file errors are carried in a [`DedupeReport`] value returned to
//! the caller; there is no shared mutable state between phases.
//!
//! # Example
//!
//! ```no_run
//! use dupelink::dedupe::{DedupeConfig, Deduplicator};
//! use dupelink::linker::LinkMode;
//! use std::path::Path;
//!
//! let config = DedupeConfig::default().with_mode(LinkMode::Hardlink);
//! let report = Deduplicator::new(config).run(Path::new("./publish"))?;
//! println!("saved {} bytes", report.bytes_saved);
//! # Ok::<(), dupelink::dedupe::DedupeError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::duplicates::{group_by_content, split_master};
use crate::linker::{LinkError, LinkMode, LinkReport, Linker};
use crate::progress::ProgressCallback;
use crate::scanner::{ExtensionFilter, HashError, Hasher, ScanError, Walker};

/// Configuration for a deduplication run.
#[derive(Clone)]
pub struct DedupeConfig {
    /// How duplicates are replaced.
    pub mode: LinkMode,
    /// Eligibility filter for scanned files.
    pub filter: ExtensionFilter,
    /// Compare duplicate and master byte-for-byte before replacing.
    pub verify: bool,
    /// Optional progress callback.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DedupeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupeConfig")
            .field("mode", &self.mode)
            .field("filter", &self.filter)
            .field("verify", &self.verify)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            mode: LinkMode::default(),
            filter: ExtensionFilter::default(),
            verify: false,
            progress: None,
        }
    }
}

impl DedupeConfig {
    /// Set the link mode.
    #[must_use]
    pub fn with_mode(mut self, mode: LinkMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the extension filter.
    #[must_use]
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable byte-for-byte verification before linking.
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }
}

/// Fatal errors aborting a run before any mutation.
#[derive(thiserror::Error, Debug)]
pub enum DedupeError {
    /// The scan root is missing or invalid.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Per-group outcome for reporting.
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    /// The retained master file
    pub master: PathBuf,
    /// Shared content size in bytes
    pub size: u64,
    /// Duplicates replaced with links
    pub linked: Vec<PathBuf>,
    /// Duplicates that could not be replaced
    pub failed: Vec<PathBuf>,
}

/// Results of a full deduplication run.
#[derive(Debug, Default)]
pub struct DedupeReport {
    /// Link mode the run used.
    pub mode: LinkMode,
    /// Eligible files found by the scanner.
    pub eligible_files: usize,
    /// Content classes with two or more members.
    pub duplicate_groups: usize,
    /// Duplicates successfully replaced with links.
    pub files_linked: usize,
    /// Duplicates that already shared their master's identity.
    pub already_linked: usize,
    /// Total bytes saved.
    pub bytes_saved: u64,
    /// Per-group outcomes in deterministic order.
    pub groups: Vec<GroupOutcome>,
    /// Files that could not be fingerprinted.
    pub hash_errors: Vec<(PathBuf, HashError)>,
    /// Duplicates that could not be replaced.
    pub link_failures: Vec<(PathBuf, LinkError)>,
}

impl DedupeReport {
    /// Whether the run completed without any per-file error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.hash_errors.is_empty() && self.link_failures.is_empty()
    }

    /// Total number of per-file errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.hash_errors.len() + self.link_failures.len()
    }

    /// Bytes saved expressed in megabytes.
    #[must_use]
    pub fn saved_megabytes(&self) -> f64 {
        self.bytes_saved as f64 / (1024.0 * 1024.0)
    }
}

/// Runs the scan, group, and link phases over one directory tree.
#[derive(Debug)]
pub struct Deduplicator {
    config: DedupeConfig,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration.
    #[must_use]
    pub fn new(config: DedupeConfig) -> Self {
        Self { config }
    }

    /// Create a deduplicator with default configuration (symbolic links,
    /// default extension filter, no verification).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DedupeConfig::default())
    }

    /// Run the full pipeline over `root`.
    ///
    /// Per-file hash and link failures are collected into the report and
    /// do not abort the run; only a missing or invalid root does.
    ///
    /// # Errors
    ///
    /// Returns [`DedupeError::Scan`] if the root cannot be scanned.
    pub fn run(&self, root: &Path) -> Result<DedupeReport, DedupeError> {
        let walker = Walker::new(root, self.config.filter.clone());
        let files = walker.collect_files()?;
        let eligible_files = files.len();
        let progress = self.config.progress.as_deref();

        let (groups, stats, hash_errors) = group_by_content(files, &Hasher::new(), progress);

        let linker = Linker::new(self.config.mode).with_verification(self.config.verify);
        let mut link_report = LinkReport::default();
        let mut outcomes = Vec::with_capacity(groups.len());

        if let Some(progress) = progress {
            progress.on_phase_start("link", stats.duplicate_files);
        }

        let mut processed = 0;
        for group in groups {
            let size = group.size;
            let (master, duplicates) = split_master(group.files);

            let linked_before = link_report.linked.len();
            let failed_before = link_report.failures.len();
            linker.link_group(&master, &duplicates, &mut link_report);

            processed += duplicates.len();
            if let Some(progress) = progress {
                progress.on_progress(processed, &master.path.to_string_lossy());
            }

            outcomes.push(GroupOutcome {
                master: master.path,
                size,
                linked: link_report.linked[linked_before..]
                    .iter()
                    .map(|outcome| outcome.duplicate.clone())
                    .collect(),
                failed: link_report.failures[failed_before..]
                    .iter()
                    .map(|(path, _)| path.clone())
                    .collect(),
            });
        }

        if let Some(progress) = progress {
            progress.on_phase_end("link");
        }

        log::info!(
            "Linked {} file(s), saved {} byte(s), {} error(s)",
            link_report.success_count(),
            link_report.bytes_saved,
            hash_errors.len() + link_report.failure_count()
        );

        Ok(DedupeReport {
            mode: self.config.mode,
            eligible_files,
            duplicate_groups: stats.duplicate_groups,
            files_linked: link_report.linked.len(),
            already_linked: link_report.already_linked,
            bytes_saved: link_report.bytes_saved,
            groups: outcomes,
            hash_errors,
            link_failures: link_report.failures,
        })
    }
}
