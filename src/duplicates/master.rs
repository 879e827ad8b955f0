//! Master selection within a duplicate group.
//!
//! One member of each group is retained as the link target. Selection uses
//! a deterministic total order so repeated runs over an unchanged tree pick
//! the same master: shallower paths win, full path order breaks ties.

use std::cmp::Ordering;

use crate::scanner::FileRecord;

/// Total order used for master selection.
///
/// Primary key: depth ascending (files closer to the root preferred).
/// Secondary key: full path lexicographic ascending.
#[must_use]
pub fn master_order(a: &FileRecord, b: &FileRecord) -> Ordering {
    a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path))
}

/// Split a duplicate group into its master and the duplicates to link.
///
/// The returned duplicates are in master order, which fixes the order
/// links are created in.
///
/// # Panics
///
/// Panics if `files` is empty; groups always have at least two members.
#[must_use]
pub fn split_master(mut files: Vec<FileRecord>) -> (FileRecord, Vec<FileRecord>) {
    assert!(!files.is_empty(), "duplicate group cannot be empty");
    files.sort_by(master_order);
    let master = files.remove(0);
    (master, files)
}
