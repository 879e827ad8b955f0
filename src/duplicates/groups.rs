//! Content-based duplicate grouping.
//!
//! # Overview
//!
//! Files are partitioned into equivalence classes keyed by their 64-bit
//! content fingerprint. Matches are by fingerprint equality alone; there is
//! no byte-for-byte re-comparison here (the linker offers an optional
//! verification pass). Classes keep scan order, and only classes with two
//! or more members are returned since singletons need no action.
//!
//! A file that cannot be read is recorded as a per-file error and excluded
//! from grouping; the remaining files are still processed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, Fingerprint, HashError, Hasher};

/// An equivalence class of files sharing one content fingerprint.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// XxHash64 fingerprint of the file content
    pub fingerprint: Fingerprint,
    /// File size in bytes (identical content implies identical size)
    pub size: u64,
    /// Member files in scan order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new group seeded with its first member.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, size: u64, files: Vec<FileRecord>) -> Self {
        Self {
            fingerprint,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of members that will be replaced by links (all but one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes reclaimable by linking every member but one.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Statistics from the hash-and-group phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of eligible files fed into the phase
    pub total_files: usize,
    /// Files successfully fingerprinted
    pub hashed_files: usize,
    /// Files that could not be read
    pub hash_errors: usize,
    /// Number of distinct content fingerprints seen
    pub unique_contents: usize,
    /// Number of classes with 2+ members
    pub duplicate_groups: usize,
    /// Members of those classes that will be replaced by links
    pub duplicate_files: usize,
}

/// Partition files into duplicate groups by content fingerprint.
///
/// Returns only groups with two or more members, in first-seen order,
/// together with phase statistics and the per-file errors encountered.
/// Any error taints the run result, but grouping proceeds with the files
/// that could be read.
///
/// # Example
///
/// ```no_run
/// use dupelink::duplicates::group_by_content;
/// use dupelink::scanner::{FileRecord, Hasher};
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/tree/a/x.dll"), 4, 2),
///     FileRecord::new(PathBuf::from("/tree/b/x.dll"), 4, 2),
/// ];
/// let (groups, stats, errors) = group_by_content(files, &Hasher::new(), None);
/// println!("{} group(s), {} error(s)", stats.duplicate_groups, errors.len());
/// # let _ = groups;
/// ```
pub fn group_by_content(
    files: Vec<FileRecord>,
    hasher: &Hasher,
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<DuplicateGroup>, GroupingStats, Vec<(PathBuf, HashError)>) {
    let mut stats = GroupingStats {
        total_files: files.len(),
        ..GroupingStats::default()
    };
    let mut errors: Vec<(PathBuf, HashError)> = Vec::new();

    if let Some(progress) = progress {
        progress.on_phase_start("hash", files.len());
    }

    // Insertion-ordered grouping: the map remembers each fingerprint's slot.
    let mut slots: HashMap<Fingerprint, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (index, file) in files.into_iter().enumerate() {
        if let Some(progress) = progress {
            progress.on_progress(index + 1, &file.path.to_string_lossy());
        }

        let fingerprint = match hasher.fingerprint(&file.path) {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                log::error!("Failed to hash {}: {}", file.path.display(), err);
                errors.push((file.path.clone(), err));
                continue;
            }
        };

        stats.hashed_files += 1;
        match slots.entry(fingerprint) {
            Entry::Occupied(slot) => groups[*slot.get()].files.push(file),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                let size = file.size;
                groups.push(DuplicateGroup::new(fingerprint, size, vec![file]));
            }
        }
    }

    if let Some(progress) = progress {
        progress.on_phase_end("hash");
    }

    stats.hash_errors = errors.len();
    stats.unique_contents = groups.len();

    let groups: Vec<DuplicateGroup> = groups.into_iter().filter(|g| g.len() > 1).collect();
    stats.duplicate_groups = groups.len();
    stats.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();

    log::info!(
        "Found {} duplicate group(s) covering {} file(s)",
        stats.duplicate_groups,
        stats.duplicate_files
    );

    (groups, stats, errors)
}
