//! Duplicate detection: content grouping and master selection.

pub mod groups;
pub mod master;

pub use groups::{group_by_content, DuplicateGroup, GroupingStats};
pub use master::{master_order, split_master};
