//! Shared folder artwork (`folder.jpg`) replacement.
//!
//! Album mode keeps one `folder.jpg` per directory. Players and file managers
//! pick it up, and Windows Media Player marks it hidden + read-only, so a plain
//! delete of the old file can fail.
//!
//! # Protocol
//!
//! 1. Stage the new image as `_newfolder.jpg`
//! 2. Remove the old `folder.jpg`; on failure clear its protection and retry once
//! 3. Still failing: discard the staged file and keep the old artwork
//! 4. Otherwise promote the staged file and protect it again
//!
//! The old file is never removed before the new one is fully written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the shared artwork file
pub const FOLDER_ART: &str = "folder.jpg";

/// Name the new artwork is staged under before promotion
pub const STAGED_ART: &str = "_newfolder.jpg";

/// Filesystem operations used by the replacement protocol.
///
/// Every step can fail independently, which is what the protocol relies on.
pub trait ArtworkFs: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Drop hidden/read-only protection so the file can be removed
    fn clear_protection(&self, path: &Path) -> io::Result<()>;
    /// Mark the file hidden/read-only
    fn set_protection(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ArtworkFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        fs::write(path, data)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn clear_protection(&self, path: &Path) -> io::Result<()> {
        protection::clear(path)
    }

    fn set_protection(&self, path: &Path) -> io::Result<()> {
        protection::set(path)
    }
}

#[cfg(windows)]
mod protection {
    //! Hidden + read-only file attributes.

    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use windows_sys::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_READONLY, GetFileAttributesW,
        INVALID_FILE_ATTRIBUTES, SetFileAttributesW,
    };

    const PROTECTED: u32 = FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_READONLY;

    fn wide(path: &Path) -> Vec<u16> {
        path.as_os_str().encode_wide().chain(Some(0)).collect()
    }

    fn update(path: &Path, f: impl FnOnce(u32) -> u32) -> io::Result<()> {
        let name = wide(path);
        // SAFETY: `name` is a NUL-terminated UTF-16 string that outlives both calls.
        unsafe {
            let current = GetFileAttributesW(name.as_ptr());
            if current == INVALID_FILE_ATTRIBUTES {
                return Err(io::Error::last_os_error());
            }
            if SetFileAttributesW(name.as_ptr(), f(current)) == 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    pub fn clear(path: &Path) -> io::Result<()> {
        update(path, |attrs| attrs & !PROTECTED)
    }

    pub fn set(path: &Path) -> io::Result<()> {
        update(path, |attrs| attrs | PROTECTED)
    }
}

#[cfg(not(windows))]
mod protection {
    //! Read-only permission bit; there is no hidden attribute outside Windows.

    use std::fs;
    use std::io;
    use std::path::Path;

    #[allow(clippy::permissions_set_readonly_false)]
    pub fn clear(path: &Path) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)
    }

    pub fn set(path: &Path) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions)
    }
}

/// Why a replacement left the slot untouched (or half-done)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplaceAborted {
    /// New artwork could not be written next to the old one
    #[error("Could not stage new folder art: {0}")]
    StageFailed(String),

    /// Old artwork could not be removed, even after clearing protection
    #[error("Could not remove existing folder art: {0}")]
    RemoveFailed(String),

    /// Old artwork was removed but the staged file could not be renamed.
    /// The staged file is left in place.
    #[error("Could not promote staged folder art: {0}")]
    PromoteFailed(String),
}

/// Result of a replacement attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Installed {
        /// The old file needed its protection cleared before it could go
        cleared_protection: bool,
        /// The new file was marked protected again
        reprotected: bool,
    },
    Aborted(ReplaceAborted),
}

impl ReplaceOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, ReplaceOutcome::Installed { .. })
    }
}

/// Swaps the shared folder artwork of a directory
#[derive(Debug, Clone, Default)]
pub struct FolderArtworkReplacer<F = LocalFs> {
    fs: F,
}

impl<F: ArtworkFs> FolderArtworkReplacer<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Path of the shared artwork file for a directory
    pub fn slot_path(dir: &Path) -> PathBuf {
        dir.join(FOLDER_ART)
    }

    /// Replace `dir/folder.jpg` with `artwork`.
    pub fn replace(&self, dir: &Path, artwork: &[u8]) -> ReplaceOutcome {
        let slot = Self::slot_path(dir);
        let staged = dir.join(STAGED_ART);

        if let Err(e) = self.fs.write(&staged, artwork) {
            tracing::warn!(path = %staged.display(), "Staging folder art failed: {}", e);
            self.discard(&staged);
            return ReplaceOutcome::Aborted(ReplaceAborted::StageFailed(e.to_string()));
        }

        let mut cleared_protection = false;
        if self.fs.exists(&slot)
            && let Err(first) = self.fs.remove(&slot)
        {
            tracing::debug!(path = %slot.display(), "Plain remove failed ({}), clearing protection", first);
            let retry = self
                .fs
                .clear_protection(&slot)
                .and_then(|()| self.fs.remove(&slot));

            if let Err(e) = retry {
                tracing::warn!(path = %slot.display(), "Keeping existing folder art: {}", e);
                self.discard(&staged);
                return ReplaceOutcome::Aborted(ReplaceAborted::RemoveFailed(format!(
                    "{}; after clearing protection: {}",
                    first, e
                )));
            }
            cleared_protection = true;
        }

        if let Err(e) = self.fs.rename(&staged, &slot) {
            tracing::error!(
                staged = %staged.display(),
                "Old folder art removed but new one could not be promoted: {}",
                e
            );
            return ReplaceOutcome::Aborted(ReplaceAborted::PromoteFailed(e.to_string()));
        }

        let reprotected = match self.fs.set_protection(&slot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %slot.display(), "Could not protect folder art: {}", e);
                false
            }
        };

        tracing::info!(path = %slot.display(), "Installed folder art");
        ReplaceOutcome::Installed {
            cleared_protection,
            reprotected,
        }
    }

    /// Bytes to embed: the slot's contents when readable, else `downloaded`.
    pub fn final_artwork(&self, dir: &Path, downloaded: Vec<u8>) -> Vec<u8> {
        match self.fs.read(&Self::slot_path(dir)) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => downloaded,
            Err(e) => {
                tracing::debug!("No usable folder art ({}), embedding download", e);
                downloaded
            }
        }
    }

    fn discard(&self, staged: &Path) {
        if self.fs.exists(staged)
            && let Err(e) = self.fs.remove(staged)
        {
            tracing::warn!(path = %staged.display(), "Could not delete staged folder art: {}", e);
        }
    }
}
