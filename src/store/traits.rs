//! store::traits
//!
//! Durable key/value store trait definition.
//!
//! # Design
//!
//! The Persistence Adapter needs nothing more than a flat string-keyed map.
//! Anything that can `get`, `set`, and `remove` strings can back a session.
//!
//! # Example
//!
//! ```
//! use gitquest::store::{KeyValueStore, MemoryStore, StoreError};
//!
//! fn touch(store: &dyn KeyValueStore) -> Result<(), StoreError> {
//!     store.set("greeting", "hello")?;
//!     assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
//!     store.remove("greeting")
//! }
//!
//! touch(&MemoryStore::new()).unwrap();
//! ```

use std::sync::Arc;

use thiserror::Error;

/// Errors from key/value backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from the backend.
    #[error("failed to read store: {0}")]
    ReadError(String),

    /// The backend holds data that cannot be parsed.
    #[error("store is corrupt: {0}")]
    Corrupt(String),

    /// Failed to write to the backend.
    #[error("failed to write store: {0}")]
    WriteError(String),

    /// Failed to remove a key.
    #[error("failed to remove from store: {0}")]
    DeleteError(String),

    /// Another process holds the store lock.
    #[error("timed out waiting for store lock")]
    LockTimeout,

    /// The lock file could not be opened or locked.
    #[error("store lock failed: {0}")]
    LockError(String),
}

/// A flat string-keyed durable store.
///
/// Implementations must be thread-safe (Send + Sync) so a debounced save can
/// run on a background task.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key.
    ///
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoreError::ReadError("disk full".into());
        assert!(err.to_string().contains("read"));

        let err = StoreError::WriteError("permission denied".into());
        assert!(err.to_string().contains("write"));

        let err = StoreError::DeleteError("io error".into());
        assert!(err.to_string().contains("remove"));

        assert!(StoreError::LockTimeout.to_string().contains("lock"));
    }
}
