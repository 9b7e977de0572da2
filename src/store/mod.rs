//! store
//!
//! The Persistence Adapter and its key/value backends.
//!
//! # Architecture
//!
//! Session state reaches durable storage through the [`KeyValueStore`]
//! trait, which has two implementations:
//!
//! - [`FileStore`]: TOML file at `~/.gitquest/state.toml` (default)
//! - [`MemoryStore`]: process-local, for tests and throwaway sessions
//!
//! [`Persistence`] encodes a [`SessionSnapshot`] onto the store and decodes
//! it back; [`DebouncedSaver`] schedules those saves off the hot path.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gitquest::store::{MemoryStore, Persistence, SessionSnapshot};
//!
//! let persistence = Persistence::new(Arc::new(MemoryStore::new()));
//! persistence.save(&SessionSnapshot::default()).unwrap();
//! assert_eq!(persistence.load(), SessionSnapshot::default());
//! ```

mod debounce;
mod file_store;
mod lock;
mod memory;
mod snapshot;
mod traits;

pub use debounce::DebouncedSaver;
pub use file_store::FileStore;
pub use lock::{StoreLock, DEFAULT_LOCK_TIMEOUT};
pub use memory::MemoryStore;
pub use snapshot::{
    PersistError, Persistence, SessionSnapshot, ACTIVE_LESSON_KEY, GIT_STATE_KEY,
    LESSON_PROGRESS_KEY,
};
pub use traits::{KeyValueStore, StoreError};
