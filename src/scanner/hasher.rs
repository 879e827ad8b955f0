//! Streaming XxHash64 content fingerprints.
//!
//! The fingerprint is a 64-bit non-cryptographic hash of the full file
//! content, computed with a fixed-size read buffer so memory use stays
//! constant regardless of file size. Fingerprint equality is the
//! equivalence key for duplicate grouping.

use std::fs::File;
use std::hash::Hasher as _;
use std::io::Read;
use std::path::Path;

use twox_hash::XxHash64;

use super::HashError;

/// 64-bit content fingerprint.
pub type Fingerprint = u64;

/// Read buffer size for streaming hashing.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Streaming file hasher.
///
/// The seed is fixed so fingerprints are stable across runs; grouping
/// relies on that when deciding a tree is already deduplicated.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute the content fingerprint of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] carrying the offending path if the file
    /// cannot be opened or read.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file =
            File::open(path).map_err(|err| HashError::from_io(path.to_path_buf(), err))?;

        let mut hasher = XxHash64::with_seed(0);
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let read = file
                .read(&mut buf)
                .map_err(|err| HashError::from_io(path.to_path_buf(), err))?;
            if read == 0 {
                break;
            }
            hasher.write(&buf[..read]);
        }

        Ok(hasher.finish())
    }
}
