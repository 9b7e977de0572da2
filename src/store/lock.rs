//! store::lock
//!
//! Exclusive lock around a store file's read-modify-write cycle.
//!
//! # Storage
//!
//! - `<store>.lock` - Sidecar file holding an OS-level exclusive lock
//!
//! The lock is released when the guard is dropped.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use super::traits::StoreError;

/// Default timeout for lock acquisition.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Guard holding the store lock.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
    file: Option<File>,
}

impl StoreLock {
    /// Lock file path for a store file.
    ///
    /// ```
    /// use std::path::Path;
    /// use gitquest::store::StoreLock;
    ///
    /// let path = StoreLock::lock_path(Path::new("/tmp/state.toml"));
    /// assert_eq!(path, Path::new("/tmp/state.toml.lock"));
    /// ```
    pub fn lock_path(store_path: &Path) -> PathBuf {
        let mut name = store_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Block until the lock is held or `timeout` expires.
    ///
    /// # Errors
    ///
    /// - [`StoreError::LockTimeout`] if another holder keeps the lock
    /// - [`StoreError::LockError`] on I/O failure
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        let path = Self::lock_path(store_path);
        let deadline = Instant::now() + timeout;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::LockError(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StoreError::LockError(format!("cannot open {}: {}", path.display(), e)))?;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self {
                        path,
                        file: Some(file),
                    })
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(StoreError::LockTimeout);
                    }
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(StoreError::LockError(format!("lock failed: {}", e))),
            }
        }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
