//! Link creation: replace duplicates with references to their master.
//!
//! # Overview
//!
//! For every duplicate the linker deletes the file and creates a link at
//! its former path pointing at the group's master:
//!
//! - **Symbolic-link mode** (default) stores the *relative* path from the
//!   duplicate's directory to the master, so the tree stays correct when
//!   moved or archived as a unit.
//! - **Hard-link mode** makes the duplicate's path denote the master's
//!   data directly. Both paths must be on the same volume. A duplicate
//!   that already shares the master's file identity is skipped.
//!
//! # Ordering
//!
//! The replacement is delete-then-link. The delete is the point of no
//! return: if link creation then fails, the duplicate's path is left
//! missing (not restored), the failure is recorded, and the run continues
//! with the remaining duplicates.
//!
//! # Trust assumption
//!
//! Fingerprint equality is treated as content equality; there is no
//! byte-for-byte re-check unless verification is enabled, in which case a
//! mismatching duplicate is left untouched and reported as a failure.

pub mod platform;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::scanner::FileRecord;
use platform::FileIdentity;

/// How duplicates are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Replace duplicates with relative symbolic links.
    #[default]
    Symlink,
    /// Replace duplicates with hard links on the same volume.
    Hardlink,
}

impl std::fmt::Display for LinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkMode::Symlink => write!(f, "symbolic link"),
            LinkMode::Hardlink => write!(f, "hard link"),
        }
    }
}

/// Error type for link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The duplicate could not be removed; it is left untouched.
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Link creation failed after the duplicate was removed, so its path
    /// is now missing.
    #[error("failed to create {mode} at {path} (original already removed): {source}")]
    Create {
        path: PathBuf,
        mode: LinkMode,
        #[source]
        source: io::Error,
    },

    /// Verification found the duplicate differs from the master; it is
    /// left untouched.
    #[error("content mismatch against master {master}: {path} left in place")]
    ContentMismatch { path: PathBuf, master: PathBuf },

    /// Verification could not read one of the files.
    #[error("verification failed for {path}: {source}")]
    Verify {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No relative path exists between the duplicate and the master
    /// (different volume prefixes).
    #[error("no relative path from {link} to {master}")]
    NoRelativePath { link: PathBuf, master: PathBuf },
}

impl LinkError {
    /// The duplicate path this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Remove { path, .. }
            | Self::Create { path, .. }
            | Self::ContentMismatch { path, .. }
            | Self::Verify { path, .. } => path,
            Self::NoRelativePath { link, .. } => link,
        }
    }
}

/// Result of one successful replacement.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    /// Path that now holds the link
    pub duplicate: PathBuf,
    /// Master the link resolves to
    pub master: PathBuf,
    /// The duplicate's recorded size
    pub bytes_saved: u64,
}

/// Accumulated results of the link phase.
#[derive(Debug, Default)]
pub struct LinkReport {
    /// Successful replacements.
    pub linked: Vec<LinkOutcome>,
    /// Duplicates that already shared the master's identity.
    pub already_linked: usize,
    /// Failed replacements with their errors.
    pub failures: Vec<(PathBuf, LinkError)>,
    /// Total bytes saved.
    pub bytes_saved: u64,
}

impl LinkReport {
    /// Number of links created.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.linked.len()
    }

    /// Number of failed replacements.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if every replacement succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Replaces duplicates with links to their master.
#[derive(Debug, Clone, Copy)]
pub struct Linker {
    mode: LinkMode,
    verify: bool,
}

enum Replacement {
    Replaced,
    AlreadyLinked,
}

impl Linker {
    /// Create a linker for the given mode, without verification.
    #[must_use]
    pub fn new(mode: LinkMode) -> Self {
        Self {
            mode,
            verify: false,
        }
    }

    /// Enable byte-for-byte verification before each replacement.
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// The configured link mode.
    #[must_use]
    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Replace every duplicate in a group with a link to `master`.
    ///
    /// Failures are recorded in `report` and do not stop the remaining
    /// duplicates from being processed.
    pub fn link_group(
        &self,
        master: &FileRecord,
        duplicates: &[FileRecord],
        report: &mut LinkReport,
    ) {
        for duplicate in duplicates {
            match self.replace_with_link(master, duplicate) {
                Ok(Replacement::Replaced) => {
                    log::debug!(
                        "Linked {} -> {}",
                        duplicate.path.display(),
                        master.path.display()
                    );
                    report.bytes_saved += duplicate.size;
                    report.linked.push(LinkOutcome {
                        duplicate: duplicate.path.clone(),
                        master: master.path.clone(),
                        bytes_saved: duplicate.size,
                    });
                }
                Ok(Replacement::AlreadyLinked) => {
                    log::debug!("Already linked: {}", duplicate.path.display());
                    report.already_linked += 1;
                }
                Err(err) => {
                    log::error!("{}", err);
                    report.failures.push((duplicate.path.clone(), err));
                }
            }
        }
    }

    fn replace_with_link(
        &self,
        master: &FileRecord,
        duplicate: &FileRecord,
    ) -> Result<Replacement, LinkError> {
        if self.mode == LinkMode::Hardlink && already_linked(&duplicate.path, &master.path) {
            return Ok(Replacement::AlreadyLinked);
        }

        if self.verify {
            self.verify_against_master(master, duplicate)?;
        }

        match self.mode {
            LinkMode::Symlink => {
                // Resolve the stored target before the destructive step.
                let target = relative_target(&duplicate.path, &master.path).ok_or_else(|| {
                    LinkError::NoRelativePath {
                        link: duplicate.path.clone(),
                        master: master.path.clone(),
                    }
                })?;
                remove_duplicate(&duplicate.path)?;
                platform::create_symlink(&target, &duplicate.path).map_err(|source| {
                    LinkError::Create {
                        path: duplicate.path.clone(),
                        mode: self.mode,
                        source,
                    }
                })?;
            }
            LinkMode::Hardlink => {
                remove_duplicate(&duplicate.path)?;
                platform::create_hard_link(&master.path, &duplicate.path).map_err(|source| {
                    LinkError::Create {
                        path: duplicate.path.clone(),
                        mode: self.mode,
                        source,
                    }
                })?;
            }
        }

        Ok(Replacement::Replaced)
    }

    fn verify_against_master(
        &self,
        master: &FileRecord,
        duplicate: &FileRecord,
    ) -> Result<(), LinkError> {
        match files_identical(&master.path, &duplicate.path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(LinkError::ContentMismatch {
                path: duplicate.path.clone(),
                master: master.path.clone(),
            }),
            Err(source) => Err(LinkError::Verify {
                path: duplicate.path.clone(),
                source,
            }),
        }
    }
}

/// Check whether two paths already denote the same data.
///
/// Returns false when identity cannot be determined; the replacement then
/// proceeds normally, which is harmless for hard links to the same master.
fn already_linked(duplicate: &Path, master: &Path) -> bool {
    match (FileIdentity::of(duplicate), FileIdentity::of(master)) {
        (Ok(Some(a)), Ok(Some(b))) => a == b,
        _ => false,
    }
}

fn remove_duplicate(path: &Path) -> Result<(), LinkError> {
    std::fs::remove_file(path).map_err(|source| LinkError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

/// Relative path a symlink placed at `link` must store to reach `target`.
///
/// Both paths must be absolute. Returns `None` if they share no common
/// prefix (for example different Windows drives).
#[must_use]
pub fn relative_target(link: &Path, target: &Path) -> Option<PathBuf> {
    let base: Vec<Component<'_>> = link.parent()?.components().collect();
    let parts: Vec<Component<'_>> = target.components().collect();

    let common = base
        .iter()
        .zip(parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for part in &parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

/// Compare two files byte-for-byte.
///
/// # Errors
///
/// Returns any I/O error encountered while reading either file.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let mut file_a = File::open(a)?;
    let mut file_b = File::open(b)?;

    if file_a.metadata()?.len() != file_b.metadata()?.len() {
        return Ok(false);
    }

    let mut buf_a = [0u8; 64 * 1024];
    let mut buf_b = [0u8; 64 * 1024];
    loop {
        let read = file_a.read(&mut buf_a)?;
        if read == 0 {
            return Ok(true);
        }
        file_b.read_exact(&mut buf_b[..read])?;
        if buf_a[..read] != buf_b[..read] {
            return Ok(false);
        }
    }
}
