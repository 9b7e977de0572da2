//! store::file_store
//!
//! File-backed key/value store.
//!
//! # Format
//!
//! A TOML table of string values, by default at `~/.gitquest/state.toml`.
//!
//! # Guarantees
//!
//! - Writes are atomic (temp file, sync, rename)
//! - Each read-modify-write cycle holds an exclusive [`StoreLock`]
//! - A missing file reads as an empty store
//! - Writes replace a file that no longer parses; reads report it
//!
//! # Example
//!
//! ```
//! use gitquest::store::{FileStore, KeyValueStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = FileStore::with_path(dir.path().join("state.toml"));
//! store.set("active_lesson", "git-basics").unwrap();
//! assert_eq!(store.get("active_lesson").unwrap().as_deref(), Some("git-basics"));
//! ```

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use super::lock::{StoreLock, DEFAULT_LOCK_TIMEOUT};
use super::traits::{KeyValueStore, StoreError};

/// Key/value store persisted to one TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl FileStore {
    /// Store at the default location, `~/.gitquest/state.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::with_path(home.join(".gitquest").join("state.toml")))
    }

    /// Store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override how long writers wait for the lock.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read store file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("cannot parse store file: {}", e)))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(entries)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize store: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write store: {}", e)))?;
            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire(&self.path, self.lock_timeout)?;
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "replacing unreadable store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        change(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
        .map_err(|e| match e {
            StoreError::WriteError(msg) => StoreError::DeleteError(msg),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::with_path(temp.path().join("state.toml"));
        (temp, store)
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("git_state").expect("get").is_none());
    }

    #[test]
    fn set_overwrites() {
        let (_temp, store) = create_test_store();
        store.set("key", "value1").expect("first set");
        store.set("key", "value2").expect("second set");
        assert_eq!(store.get("key").expect("get"), Some("value2".to_string()));
    }

    #[test]
    fn remove_existing_and_missing() {
        let (_temp, store) = create_test_store();
        store.set("key", "value").expect("set");
        store.remove("key").expect("remove");
        store.remove("key").expect("remove again");
        assert!(store.get("key").expect("get").is_none());
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("nested").join("state.toml");
        let store = FileStore::with_path(path.clone());

        store.set("key", "value").expect("set");
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_a_read_error() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "invalid = [unclosed").expect("write bad toml");

        let err = store.get("key").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert!(err.to_string().contains("cannot parse"), "{err}");
    }

    #[test]
    fn writes_replace_corrupt_file() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "invalid = [unclosed").expect("write bad toml");

        store.set("git_state", "{}").expect("set over corrupt file");
        assert_eq!(store.get("git_state").expect("get").as_deref(), Some("{}"));

        fs::write(store.path(), "= = =").expect("write bad toml");
        store.remove("git_state").expect("remove over corrupt file");
        assert!(store.get("git_state").expect("get").is_none());
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("state.toml");

        FileStore::with_path(path.clone())
            .set("key", "value")
            .expect("set");
        let reread = FileStore::with_path(path).get("key").expect("get");
        assert_eq!(reread, Some("value".to_string()));
    }

    #[test]
    fn json_values_survive() {
        let (_temp, store) = create_test_store();
        let json = r#"{"commits":[],"message":"with \"quotes\"\nand newline"}"#;
        store.set("git_state", json).expect("set");
        assert_eq!(store.get("git_state").expect("get").as_deref(), Some(json));
    }

    #[test]
    fn write_blocked_by_held_lock() {
        let (_temp, store) = create_test_store();
        let store = store.with_lock_timeout(Duration::from_millis(100));
        let _held = StoreLock::acquire(store.path(), DEFAULT_LOCK_TIMEOUT).expect("lock");

        assert!(matches!(
            store.set("key", "value"),
            Err(StoreError::LockTimeout)
        ));
    }
}
