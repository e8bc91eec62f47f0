// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::SyncError;
use rustix::fs::{FlockOperation, flock};
use std::{fs::{File, OpenOptions},
          io::Write,
          os::unix::fs::OpenOptionsExt,
          path::{Path, PathBuf}};

/// Permissions for a newly created lock file, before the umask is applied.
pub const LOCK_FILE_MODE: u32 = 0o666;

/// An exclusive [`flock(2)`] on a file.
///
/// - The file is created if missing and truncated when locked.
/// - Locking never waits: if another handle holds the lock, [`try_new()`] and
///   [`lock()`] fail right away.
/// - Locks belong to the open file, not to the process. A second [`LockFile`] on the same
///   path fails even inside the same process.
/// - The lock is released by [`unlock()`], on drop, or when the process exits.
///
/// [`flock(2)`]: https://man7.org/linux/man-pages/man2/flock.2.html
/// [`lock()`]: Self::lock
/// [`try_new()`]: Self::try_new
/// [`unlock()`]: Self::unlock
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    /// `Some` while the lock is held.
    file: Option<File>,
}

impl LockFile {
    /// Opens `path` and takes the lock.
    ///
    /// # Errors
    ///
    /// [`SyncError::Io`] if the file can't be opened, or the lock is held elsewhere
    /// (`EWOULDBLOCK`).
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let mut it = Self {
            path: path.as_ref().to_path_buf(),
            file: None,
        };
        it.lock()?;
        Ok(it)
    }

    /// Re-takes the lock after [`unlock()`].
    ///
    /// # Errors
    ///
    /// - [`SyncError::AlreadyLocked`] if this handle already holds the lock.
    /// - [`SyncError::Io`] if the file can't be opened, or the lock is held elsewhere.
    ///
    /// [`unlock()`]: Self::unlock
    pub fn lock(&mut self) -> Result<(), SyncError> {
        if self.file.is_some() {
            return Err(SyncError::AlreadyLocked {
                what: self.path.display().to_string(),
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .mode(LOCK_FILE_MODE)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        flock(&file, FlockOperation::NonBlockingLockExclusive)
            .map_err(|errno| self.io_error(errno.into()))?;

        tracing::debug!(message = "LockFile locked", path = %self.path.display());
        self.file = Some(file);
        Ok(())
    }

    /// Writes all of `data` to the locked file.
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotLocked`] if the lock isn't held.
    /// - [`SyncError::Io`] if the write fails.
    pub fn write(&mut self, data: &[u8]) -> Result<(), SyncError> {
        let Some(file) = self.file.as_mut() else {
            return Err(SyncError::NotLocked { what: "lock file" });
        };
        let result = file.write_all(data).and_then(|()| file.flush());
        result.map_err(|source| self.io_error(source))
    }

    /// Releases the lock and closes the file. Does nothing if not locked.
    pub fn unlock(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        // Closing the file releases the lock anyway; unlocking first just makes it
        // explicit.
        if let Err(errno) = flock(&file, FlockOperation::Unlock) {
            tracing::error!(
                message = "LockFile::unlock() failed",
                path = %self.path.display(),
                error = %errno
            );
        }
        drop(file);
        tracing::debug!(message = "LockFile unlocked", path = %self.path.display());
    }

    #[must_use]
    pub fn is_locked(&self) -> bool { self.file.is_some() }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn io_error(&self, source: std::io::Error) -> SyncError {
        SyncError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) { self.unlock(); }
}
