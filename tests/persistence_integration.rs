//! Integration tests for the Persistence Adapter.
//!
//! Exercises the file-backed store on real temp directories, the fallback
//! to initial state on corrupt data, and the session's debounced autosave.

use std::sync::Arc;
use std::time::Duration;

use gitquest::core::graph::GraphState;
use gitquest::engine::SequentialStamper;
use gitquest::session::{Session, SessionOptions};
use gitquest::store::{
    FileStore, KeyValueStore, MemoryStore, Persistence, GIT_STATE_KEY, LESSON_PROGRESS_KEY,
};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn file_store(dir: &TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::with_path(dir.path().join("state.toml")))
}

fn manual(store: Arc<dyn KeyValueStore>) -> Session {
    Session::open(store, SessionOptions::default().manual_save())
        .with_stamper(SequentialStamper::default())
}

/// Two branches, three commits, one merge.
fn build_history(session: &mut Session) {
    session.commit("Initial commit").unwrap();
    session.create_branch("feature").unwrap();
    session.commit("Add login").unwrap();
    session.checkout("main").unwrap();
    session.merge("feature").unwrap();
}

// =============================================================================
// File store
// =============================================================================

#[test]
fn graph_survives_restart() {
    let dir = TempDir::new().unwrap();

    let expected = {
        let mut session = manual(file_store(&dir));
        build_history(&mut session);
        session.select_lesson("git-basics").unwrap();
        session.save().unwrap();
        session.snapshot()
    };
    assert!(expected.graph.branches.len() >= 2);
    assert!(expected.graph.commits.len() >= 3);

    let reopened = manual(file_store(&dir));
    assert_eq!(reopened.snapshot(), expected);
    assert_eq!(reopened.lessons().active_id(), Some("git-basics"));
}

#[test]
fn corrupt_graph_falls_back_to_initial() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.set(GIT_STATE_KEY, "{ not json").unwrap();
    store.set(LESSON_PROGRESS_KEY, "[]").unwrap();

    let snapshot = Persistence::new(store).load();
    assert_eq!(snapshot.graph, GraphState::initial());
    assert!(snapshot.lessons.is_empty());
}

#[test]
fn graph_breaking_invariants_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    // A head pointing at a commit that does not exist.
    let broken = r##"{
        "commits": [],
        "branches": {"main": {"name": "main", "head": "c0000099", "color": "#2563eb", "is_active": true}},
        "current_branch": "main",
        "current_commit": null
    }"##;
    store.set(GIT_STATE_KEY, broken).unwrap();

    assert_eq!(Persistence::new(store).load().graph, GraphState::initial());
}

#[test]
fn unreadable_store_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("state.toml"), "this is = = not toml").unwrap();

    let session = manual(file_store(&dir));
    assert_eq!(session.graph(), &GraphState::initial());
}

#[test]
fn unreadable_store_file_accepts_saves_and_resets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();
    let store = file_store(&dir);

    let mut session = manual(store.clone());
    session.commit("Initial commit").unwrap();
    session.save().unwrap();
    assert_eq!(Persistence::new(store.clone()).load().graph.commits.len(), 1);

    std::fs::write(&path, "still [ not toml").unwrap();
    session.reset_all().unwrap();
    assert!(!store.contains(GIT_STATE_KEY).unwrap());
}

#[test]
fn reset_all_clears_the_store() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    {
        let mut session = manual(store.clone());
        build_history(&mut session);
        session.save().unwrap();
        session.reset_all().unwrap();
    }
    assert!(!store.contains(GIT_STATE_KEY).unwrap());

    let reopened = manual(store);
    assert_eq!(reopened.graph(), &GraphState::initial());
}

// =============================================================================
// Autosave
// =============================================================================

#[test]
fn autosave_without_runtime_saves_immediately() {
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::open(store.clone(), SessionOptions::default())
        .with_stamper(SequentialStamper::default());

    session.commit("one").unwrap();
    assert!(!session.save_pending());
    assert!(store.contains(GIT_STATE_KEY).unwrap());
}

#[tokio::test(start_paused = true)]
async fn autosave_debounces_a_burst() {
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::open(
        store.clone(),
        SessionOptions {
            debounce: Duration::from_millis(500),
            ..SessionOptions::default()
        },
    )
    .with_stamper(SequentialStamper::default());

    for i in 0..5 {
        session.commit(&format!("commit {i}")).unwrap();
        tokio::time::advance(Duration::from_millis(50)).await;
    }
    assert_eq!(store.writes(), 0);
    assert!(session.save_pending());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!session.save_pending());

    let loaded = Persistence::new(store).load();
    assert_eq!(loaded.graph.commits.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn dropping_session_flushes_pending_save() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut session = Session::open(store.clone(), SessionOptions::default())
            .with_stamper(SequentialStamper::default());
        session.commit("unsaved").unwrap();
        assert!(session.save_pending());
    }

    let loaded = Persistence::new(store).load();
    assert_eq!(loaded.graph.commits.len(), 1);
    assert_eq!(loaded.graph.commits[0].message, "unsaved");
}
