//! store::snapshot
//!
//! Encoding session state to and from a [`KeyValueStore`].
//!
//! # Keys
//!
//! | Key | Value |
//! |---|---|
//! | `git_state` | JSON [`GraphState`], timestamps as RFC 3339 |
//! | `lesson_progress` | JSON map of lesson id to [`LessonProgress`] |
//! | `active_lesson` | Lesson id, absent when none is selected |
//!
//! # Loading
//!
//! Loading is best-effort. Each key decodes independently; a missing,
//! unreadable, or invalid value falls back to its initial value and a
//! warning is logged. Loading never fails.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::traits::{KeyValueStore, StoreError};
use crate::core::graph::GraphState;
use crate::engine;
use crate::lessons::LessonProgress;

pub const GIT_STATE_KEY: &str = "git_state";
pub const LESSON_PROGRESS_KEY: &str = "lesson_progress";
pub const ACTIVE_LESSON_KEY: &str = "active_lesson";

/// Errors from saving.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Everything a session persists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub graph: GraphState,
    pub lessons: BTreeMap<String, LessonProgress>,
    pub active_lesson: Option<String>,
}

/// The Persistence Adapter over an injected store.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Write every key.
    ///
    /// Everything is encoded before the first write, so an encode failure
    /// leaves the store untouched.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        let graph = serde_json::to_string(&snapshot.graph)?;
        let lessons = serde_json::to_string(&snapshot.lessons)?;

        self.store.set(GIT_STATE_KEY, &graph)?;
        self.store.set(LESSON_PROGRESS_KEY, &lessons)?;
        match &snapshot.active_lesson {
            Some(id) => self.store.set(ACTIVE_LESSON_KEY, id)?,
            None => self.store.remove(ACTIVE_LESSON_KEY)?,
        }

        debug!(commits = snapshot.graph.commits.len(), "session saved");
        Ok(())
    }

    /// Read every key, falling back to initial values.
    pub fn load(&self) -> SessionSnapshot {
        let graph = self
            .read(GIT_STATE_KEY)
            .and_then(|text| match engine::load_json(&text) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(error = %e, "stored graph is invalid; starting fresh");
                    None
                }
            })
            .unwrap_or_else(GraphState::initial);

        let lessons = self
            .read(LESSON_PROGRESS_KEY)
            .and_then(|text| match serde_json::from_str(&text) {
                Ok(map) => Some(map),
                Err(e) => {
                    warn!(error = %e, "stored lesson progress is invalid; starting fresh");
                    None
                }
            })
            .unwrap_or_default();

        let active_lesson = self.read(ACTIVE_LESSON_KEY).filter(|id| !id.is_empty());

        SessionSnapshot {
            graph,
            lessons,
            active_lesson,
        }
    }

    /// Remove every key.
    pub fn clear(&self) -> Result<(), PersistError> {
        for key in [GIT_STATE_KEY, LESSON_PROGRESS_KEY, ACTIVE_LESSON_KEY] {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "cannot read stored value");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SequentialStamper;
    use crate::lessons::LessonTracker;
    use crate::store::MemoryStore;

    fn sample() -> SessionSnapshot {
        let mut s = SequentialStamper::default();
        let g = engine::commit(&GraphState::initial(), "one", &mut s).unwrap();
        let g = engine::create_branch(&g, "feature").unwrap();
        let g = engine::commit(&g, "two", &mut s).unwrap();
        let g = engine::checkout(&g, "main").unwrap();
        let g = engine::commit(&g, "three", &mut s).unwrap();

        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        tracker.advance(&g);

        SessionSnapshot {
            graph: g,
            lessons: tracker.all_progress().clone(),
            active_lesson: Some("git-basics".into()),
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        let snapshot = sample();
        persistence.save(&snapshot).unwrap();
        assert_eq!(persistence.load(), snapshot);
    }

    #[test]
    fn empty_store_loads_initial() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        assert_eq!(persistence.load(), SessionSnapshot::default());
    }

    #[test]
    fn garbage_falls_back_per_key() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone());
        persistence.save(&sample()).unwrap();
        store.set(GIT_STATE_KEY, "{ not json").unwrap();

        let loaded = persistence.load();
        assert_eq!(loaded.graph, GraphState::initial());
        assert_eq!(loaded.active_lesson.as_deref(), Some("git-basics"));
        assert!(!loaded.lessons.is_empty());
    }

    #[test]
    fn dangling_reference_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone());
        let mut snapshot = sample();
        snapshot.graph.commits.truncate(1);
        persistence.save(&snapshot).unwrap();

        assert_eq!(persistence.load().graph, GraphState::initial());
    }

    #[test]
    fn epoch_millis_timestamps_are_accepted() {
        let store = Arc::new(MemoryStore::new());
        let json = r##"{
            "commits": [{"id": "abc123", "message": "old", "timestamp": 1700000000000,
                         "parent": null, "branch": "main"}],
            "branches": {"main": {"name": "main", "head": "abc123", "color": "#2196f3", "is_active": true}},
            "current_branch": "main",
            "current_commit": "abc123"
        }"##;
        store.set(GIT_STATE_KEY, json).unwrap();

        let loaded = Persistence::new(store).load();
        assert_eq!(loaded.graph.commits.len(), 1);
        assert_eq!(
            loaded.graph.commits[0].timestamp.as_datetime().timestamp_millis(),
            1_700_000_000_000
        );
    }

    #[test]
    fn clear_removes_all_keys() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone());
        persistence.save(&sample()).unwrap();
        persistence.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn no_active_lesson_removes_key() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone());
        persistence.save(&sample()).unwrap();
        persistence
            .save(&SessionSnapshot {
                active_lesson: None,
                ..sample()
            })
            .unwrap();
        assert!(!store.contains(ACTIVE_LESSON_KEY).unwrap());
    }
}
