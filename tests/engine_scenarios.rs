//! End-to-end scenarios for the Graph Engine and Lesson Engine.
//!
//! Each test drives the public API the way a learner would and checks the
//! resulting graph and lesson state.

use gitquest::core::graph::GraphState;
use gitquest::core::verify::verify;
use gitquest::engine::{self, EngineError, Operation, OperationKind, SequentialStamper};
use gitquest::lessons::{Lesson, LessonStep, LessonTracker, Predicate};

// =============================================================================
// Helpers
// =============================================================================

fn assert_invariants(state: &GraphState) {
    let result = verify(state);
    assert!(result.ok, "invariants broken: {}", result.summary());
    let active = state.branches.values().filter(|b| b.is_active).count();
    assert_eq!(active, 1, "exactly one active branch");
}

fn run(ops: &[Operation]) -> GraphState {
    let mut stamper = SequentialStamper::default();
    let mut state = GraphState::initial();
    for op in ops {
        state = engine::apply(&state, op, &mut stamper).expect("operation should succeed");
        assert_invariants(&state);
    }
    state
}

fn commit(message: &str) -> Operation {
    Operation::Commit {
        message: message.into(),
    }
}

fn branch(name: &str) -> Operation {
    Operation::Branch { name: name.into() }
}

fn checkout(target: &str) -> Operation {
    Operation::Checkout {
        target: target.into(),
    }
}

fn merge(source: &str) -> Operation {
    Operation::Merge {
        source: source.into(),
    }
}

// =============================================================================
// Graph scenarios
// =============================================================================

#[test]
fn first_commit_on_main() {
    let state = run(&[commit("Initial commit")]);

    assert_eq!(state.commits.len(), 1);
    let only = &state.commits[0];
    assert_eq!(only.message, "Initial commit");
    assert_eq!(state.branch("main").unwrap().head.as_ref(), Some(&only.id));
    assert_eq!(state.current_commit.as_ref(), Some(&only.id));
}

#[test]
fn feature_branch_merged_into_main() {
    let ops = [
        branch("feature"),
        checkout("feature"),
        commit("add login"),
        checkout("main"),
    ];
    let before_merge = run(&ops);
    let feature_head = before_merge.branch("feature").unwrap().head.clone();

    let state = run(&[ops.as_slice(), &[merge("feature")]].concat());

    let merge_commit = state
        .commits
        .iter()
        .find(|c| c.message == "Merge branch 'feature' into main")
        .expect("merge commit exists");
    assert_eq!(merge_commit.branch.as_str(), "main");
    assert_eq!(
        state.branch("main").unwrap().head.as_ref(),
        Some(&merge_commit.id)
    );
    assert_eq!(state.branch("feature").unwrap().head, feature_head);
}

#[test]
fn duplicate_branch_leaves_state_unchanged() {
    let state = run(&[branch("dup")]);
    let err = engine::create_branch(&state, "dup").unwrap_err();
    assert_eq!(err, EngineError::DuplicateBranch("dup".into()));
    // The input is borrowed immutably; confirm it is still the same value.
    assert_eq!(state, run(&[branch("dup")]));
}

#[test]
fn revert_of_unknown_commit_fails() {
    let state = run(&[commit("one")]);
    let mut stamper = SequentialStamper::starting_after(1);
    let err = engine::revert(&state, "no-such-id", &mut stamper).unwrap_err();
    assert_eq!(err, EngineError::UnknownCommit("no-such-id".into()));
    assert_eq!(state.commits.len(), 1);
}

#[test]
fn merge_of_empty_branch_fails() {
    let state = run(&[commit("one"), branch("empty-later")]);
    // The new branch forked at "one", so it has a head and can merge.
    let mut stamper = SequentialStamper::starting_after(1);
    assert!(engine::merge(&state, "empty-later", &mut stamper).is_ok());

    let fresh = run(&[branch("empty")]);
    assert_eq!(
        engine::merge(&fresh, "empty", &mut stamper).unwrap_err(),
        EngineError::EmptyBranch("empty".into())
    );
}

#[test]
fn divergent_branches_share_a_parent() {
    let state = run(&[
        commit("base"),
        branch("left"),
        commit("left work"),
        checkout("main"),
        branch("right"),
        commit("right work"),
    ]);

    let base = &state.commits[0].id;
    let children: Vec<_> = state
        .commits
        .iter()
        .filter(|c| c.parent.as_ref() == Some(base))
        .map(|c| c.message.as_str())
        .collect();
    assert_eq!(children, vec!["left work", "right work"]);
}

#[test]
fn reset_returns_initial_state() {
    let state = run(&[commit("one"), branch("feature")]);
    assert_ne!(state, engine::reset());
    assert_eq!(engine::reset(), GraphState::initial());
}

#[test]
fn commits_carry_their_branch_color() {
    let state = run(&[commit("on main"), branch("feature"), commit("on feature")]);
    for commit in &state.commits {
        let branch = state.branch(commit.branch.as_str()).unwrap();
        assert_eq!(commit.color.as_ref(), Some(&branch.color));
    }
}

// =============================================================================
// Lesson scenarios
// =============================================================================

fn substring_lesson() -> Lesson {
    let step = |text: &str| LessonStep {
        title: format!("Commit {text}"),
        description: String::new(),
        expected: OperationKind::Commit,
        hint: None,
        predicate: Some(Predicate::commit_message_contains(text)),
    };
    Lesson {
        id: "three-commits".into(),
        title: "Three commits".into(),
        description: String::new(),
        steps: vec![step("first"), step("second"), step("third")],
    }
}

#[test]
fn three_step_lesson_completes_on_final_advance() {
    let mut tracker = LessonTracker::new(vec![substring_lesson()]);
    tracker.select("three-commits").unwrap();
    let mut stamper = SequentialStamper::default();

    let state = engine::commit(&GraphState::initial(), "the first one", &mut stamper).unwrap();
    tracker.advance(&state);
    let state = engine::commit(&state, "the second one", &mut stamper).unwrap();
    tracker.advance(&state);

    let progress = tracker.active_progress().unwrap();
    assert_eq!(progress.current_step, 3);
    assert!(!progress.completed);

    let state = engine::commit(&state, "the third one", &mut stamper).unwrap();
    tracker.advance(&state);
    let progress = tracker.active_progress().unwrap();
    assert!(progress.completed);
    assert_eq!(progress.progress, 1.0);
}

#[test]
fn builtin_advanced_lesson_via_auto_advance() {
    let mut tracker = LessonTracker::builtin();
    tracker.select("advanced-git").unwrap();
    let mut stamper = SequentialStamper::default();

    let state =
        engine::commit(&GraphState::initial(), "Important milestone", &mut stamper).unwrap();
    tracker.observe(OperationKind::Commit, &state);
    let state = engine::commit(&state, "Fix bug in parser", &mut stamper).unwrap();
    tracker.observe(OperationKind::Commit, &state);
    let bug = state.commits[1].id.to_string();
    let state = engine::revert(&state, &bug, &mut stamper).unwrap();
    tracker.observe(OperationKind::Revert, &state);

    assert!(tracker.active_progress().unwrap().completed);
}
