//! Platform-specific link creation and file identity.
//!
//! Hard-link creation is one logical operation with a different underlying
//! mechanism per host family: `CreateHardLinkW` on Windows, the POSIX
//! `link(2)` call elsewhere. Both surface failures as `io::Error` so the
//! linker stays platform-agnostic.

use std::io;
use std::path::Path;

#[cfg(windows)]
fn to_wide(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Create a hard link at `link` denoting the same data as `target`.
///
/// Requires `link` and `target` to be on the same filesystem volume.
///
/// # Errors
///
/// Returns the underlying OS error (cross-device, permission denied,
/// unsupported filesystem) without modifying either path.
#[cfg(windows)]
pub fn create_hard_link(target: &Path, link: &Path) -> io::Result<()> {
    use winapi::um::winbase::CreateHardLinkW;

    let link_wide = to_wide(link);
    let target_wide = to_wide(target);
    let created =
        unsafe { CreateHardLinkW(link_wide.as_ptr(), target_wide.as_ptr(), std::ptr::null_mut()) };
    if created == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Create a hard link at `link` denoting the same data as `target`.
///
/// Requires `link` and `target` to be on the same filesystem volume.
///
/// # Errors
///
/// Returns the underlying OS error (cross-device, permission denied,
/// unsupported filesystem) without modifying either path.
#[cfg(not(windows))]
pub fn create_hard_link(target: &Path, link: &Path) -> io::Result<()> {
    std::fs::hard_link(target, link)
}

/// Create a symbolic link at `link` whose stored target is `target`.
///
/// `target` is stored verbatim, so passing a relative path keeps the link
/// valid when the tree is moved as a unit.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let _ = (target, link);
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

/// Whether [`FileIdentity::of`] can return identities on this platform.
#[must_use]
pub const fn identity_supported() -> bool {
    cfg!(any(unix, windows))
}

/// Identity of a file's underlying data on its volume.
///
/// Two paths with equal identity are hard links to the same data, so
/// re-linking them would be a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
    #[cfg(windows)]
    volume_serial: u32,
    #[cfg(windows)]
    file_index: u64,
    #[cfg(not(any(unix, windows)))]
    _unsupported: (),
}

impl FileIdentity {
    /// Look up the identity of the file at `path`.
    ///
    /// Returns `Ok(None)` when the platform cannot provide one.
    ///
    /// # Errors
    ///
    /// Returns the underlying OS error if the file cannot be inspected.
    #[cfg(unix)]
    pub fn of(path: &Path) -> io::Result<Option<Self>> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::metadata(path)?;
        Ok(Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }))
    }

    #[cfg(windows)]
    pub fn of(path: &Path) -> io::Result<Option<Self>> {
        use winapi::um::fileapi::{
            CreateFileW, GetFileInformationByHandle, BY_HANDLE_FILE_INFORMATION, OPEN_EXISTING,
        };
        use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
        use winapi::um::winnt::{FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FILE_SHARE_WRITE};

        let wide = to_wide(path);
        unsafe {
            let handle = CreateFileW(
                wide.as_ptr(),
                0,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                std::ptr::null_mut(),
                OPEN_EXISTING,
                FILE_ATTRIBUTE_NORMAL,
                std::ptr::null_mut(),
            );
            if handle == INVALID_HANDLE_VALUE {
                return Err(io::Error::last_os_error());
            }

            let mut info: BY_HANDLE_FILE_INFORMATION = std::mem::zeroed();
            let ok = GetFileInformationByHandle(handle, &mut info);
            CloseHandle(handle);
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }

            let file_index =
                (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow);
            Ok(Some(Self {
                volume_serial: info.dwVolumeSerialNumber,
                file_index,
            }))
        }
    }

    #[cfg(not(any(unix, windows)))]
    pub fn of(path: &Path) -> io::Result<Option<Self>> {
        let _ = path;
        Ok(None)
    }
}
