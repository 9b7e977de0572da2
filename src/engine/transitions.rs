//! engine::transitions
//!
//! Pure state transitions for every graph operation.
//!
//! # Contract
//!
//! Each function borrows the current [`GraphState`] and either returns a new
//! state or an [`EngineError`]. The input is never modified, so a failed
//! operation leaves the caller's state exactly as it was.
//!
//! # Invariants preserved
//!
//! - Exactly one branch is active, and it is `current_branch`
//! - No transition introduces an id that does not resolve
//! - `commits` only grows (except `reset` and `load`)

use std::collections::HashSet;

use tracing::{debug, info};

use super::error::EngineError;
use super::operation::Operation;
use super::stamp::Stamper;
use crate::core::graph::{Branch, Commit, GraphState};
use crate::core::palette::next_color;
use crate::core::types::BranchName;
use crate::core::verify::verify;

/// Message recorded by a merge.
///
/// # Example
///
/// ```
/// use gitquest::engine::merge_message;
///
/// assert_eq!(merge_message("feature", "main"), "Merge branch 'feature' into main");
/// ```
pub fn merge_message(source: &str, target: &str) -> String {
    format!("Merge branch '{source}' into {target}")
}

/// Message recorded by a revert.
pub fn revert_message(original: &str) -> String {
    format!("Revert \"{original}\"")
}

/// Prefix shared by every revert message.
pub const REVERT_PREFIX: &str = "Revert \"";

/// Apply any operation.
pub fn apply(
    state: &GraphState,
    op: &Operation,
    stamper: &mut dyn Stamper,
) -> Result<GraphState, EngineError> {
    debug!(kind = %op.kind(), "applying operation");
    match op {
        Operation::Commit { message } => commit(state, message, stamper),
        Operation::Branch { name } => create_branch(state, name),
        Operation::Merge { source } => merge(state, source, stamper),
        Operation::Checkout { target } => checkout(state, target),
        Operation::Revert { commit } => revert(state, commit, stamper),
        Operation::Issue { title, description } => create_issue(state, title, description),
    }
}

/// Append a commit to the active branch.
///
/// The new commit's parent is the active branch's head (even when the
/// learner is viewing a detached commit).
///
/// # Errors
///
/// - [`EngineError::InvalidArgument`] if `message` is blank
/// - [`EngineError::MalformedState`] if the active branch is missing
///
/// # Example
///
/// ```
/// use gitquest::core::graph::GraphState;
/// use gitquest::engine::{commit, SequentialStamper};
///
/// let state = commit(&GraphState::initial(), "Initial commit", &mut SequentialStamper::default()).unwrap();
/// assert_eq!(state.commits.len(), 1);
/// assert_eq!(state.branch("main").unwrap().head, state.current_commit);
/// ```
pub fn commit(
    state: &GraphState,
    message: &str,
    stamper: &mut dyn Stamper,
) -> Result<GraphState, EngineError> {
    require_non_blank("commit message", message)?;
    append_on_active(state, message.to_string(), stamper)
}

/// Fork a new branch at the current branch's head and switch to it.
///
/// # Errors
///
/// - [`EngineError::InvalidArgument`] if `name` is not a valid branch name
/// - [`EngineError::DuplicateBranch`] if the name is taken (case-sensitive)
pub fn create_branch(state: &GraphState, name: &str) -> Result<GraphState, EngineError> {
    let name = BranchName::new(name)?;
    if state.branches.contains_key(&name) {
        return Err(EngineError::DuplicateBranch(name.to_string()));
    }

    let fork_point = active(state)?.head.clone();
    let color = {
        let used: HashSet<_> = state.branches.values().map(|b| &b.color).collect();
        next_color(&used)
            .ok_or_else(|| EngineError::InvalidArgument("no unused branch color left".into()))?
    };

    let mut next = state.clone();
    next.branches
        .insert(name.clone(), Branch::new(name.clone(), fork_point.clone(), color));
    activate(&mut next, &name);
    next.current_commit = fork_point;

    debug!(branch = %name, "created branch");
    Ok(next)
}

/// Record a merge of `source` into the active branch.
///
/// Produces one single-parent commit on the target whose parent is the
/// target's head. The source branch is left untouched.
///
/// # Errors
///
/// - [`EngineError::InvalidArgument`] if `source` is blank
/// - [`EngineError::UnknownBranch`] if `source` does not exist
/// - [`EngineError::EmptyBranch`] if `source` has no commits
pub fn merge(
    state: &GraphState,
    source: &str,
    stamper: &mut dyn Stamper,
) -> Result<GraphState, EngineError> {
    require_non_blank("source branch", source)?;
    let source_branch = state
        .branch(source)
        .ok_or_else(|| EngineError::UnknownBranch(source.to_string()))?;
    if source_branch.head.is_none() {
        return Err(EngineError::EmptyBranch(source.to_string()));
    }

    let target = active(state)?.name.clone();
    append_on_active(state, merge_message(source, target.as_str()), stamper)
}

/// Switch to a branch, or view a commit detached.
///
/// `target` is tried as an exact branch name first, then as an exact
/// commit id. A detached checkout moves only `current_commit`.
///
/// # Errors
///
/// - [`EngineError::InvalidArgument`] if `target` is blank
/// - [`EngineError::UnknownTarget`] if neither lookup succeeds
pub fn checkout(state: &GraphState, target: &str) -> Result<GraphState, EngineError> {
    require_non_blank("checkout target", target)?;

    if let Some(branch) = state.branch(target) {
        let name = branch.name.clone();
        let head = branch.head.clone();
        let mut next = state.clone();
        activate(&mut next, &name);
        next.current_commit = head;
        return Ok(next);
    }

    if let Some(commit) = state.commit_by_str(target) {
        let mut next = state.clone();
        next.current_commit = Some(commit.id.clone());
        return Ok(next);
    }

    Err(EngineError::UnknownTarget(target.to_string()))
}

/// Record a revert of `commit_id` on the active branch.
///
/// The new commit's parent is the active branch's head, not the reverted
/// commit. Only the message marks what was reverted.
///
/// # Errors
///
/// - [`EngineError::InvalidArgument`] if `commit_id` is blank
/// - [`EngineError::UnknownCommit`] if no commit has that id
pub fn revert(
    state: &GraphState,
    commit_id: &str,
    stamper: &mut dyn Stamper,
) -> Result<GraphState, EngineError> {
    require_non_blank("commit id", commit_id)?;
    let original = state
        .commit_by_str(commit_id)
        .ok_or_else(|| EngineError::UnknownCommit(commit_id.to_string()))?;

    append_on_active(state, revert_message(&original.message), stamper)
}

/// File an issue.
///
/// Issues live outside the commit graph: the state is returned unchanged
/// and the issue is only logged.
///
/// # Errors
///
/// [`EngineError::InvalidArgument`] if `title` is blank.
pub fn create_issue(
    state: &GraphState,
    title: &str,
    description: &str,
) -> Result<GraphState, EngineError> {
    require_non_blank("issue title", title)?;
    info!(title, description, "issue filed");
    Ok(state.clone())
}

/// The canonical initial state.
pub fn reset() -> GraphState {
    GraphState::initial()
}

/// Accept a whole state after checking every invariant.
///
/// # Errors
///
/// [`EngineError::MalformedState`] listing each violation.
pub fn load(candidate: GraphState) -> Result<GraphState, EngineError> {
    let result = verify(&candidate);
    if result.ok {
        Ok(candidate)
    } else {
        Err(EngineError::MalformedState(result.summary()))
    }
}

/// Parse serialized JSON and [`load`] it.
///
/// # Errors
///
/// [`EngineError::MalformedState`] if the text does not parse or the
/// parsed state breaks an invariant.
pub fn load_json(serialized: &str) -> Result<GraphState, EngineError> {
    let candidate: GraphState = serde_json::from_str(serialized)
        .map_err(|e| EngineError::MalformedState(e.to_string()))?;
    load(candidate)
}

fn active(state: &GraphState) -> Result<&Branch, EngineError> {
    state.active_branch().ok_or_else(|| {
        EngineError::MalformedState(format!(
            "current branch '{}' does not exist",
            state.current_branch
        ))
    })
}

/// Append a commit on the active branch and move head and view to it.
fn append_on_active(
    state: &GraphState,
    message: String,
    stamper: &mut dyn Stamper,
) -> Result<GraphState, EngineError> {
    let branch = active(state)?;
    let commit = Commit {
        id: stamper.next_id(),
        message,
        timestamp: stamper.now(),
        parent: branch.head.clone(),
        branch: branch.name.clone(),
        color: Some(branch.color.clone()),
    };
    let name = branch.name.clone();
    let id = commit.id.clone();

    let mut next = state.clone();
    next.commits.push(commit);
    if let Some(head) = next.branches.get_mut(&name) {
        head.head = Some(id.clone());
    }
    next.current_commit = Some(id);
    Ok(next)
}

/// Make `name` the only active branch.
fn activate(state: &mut GraphState, name: &BranchName) {
    for branch in state.branches.values_mut() {
        branch.is_active = &branch.name == name;
    }
    state.current_branch = name.clone();
}

fn require_non_blank(what: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        Err(EngineError::InvalidArgument(format!("{what} cannot be empty")))
    } else {
        Ok(())
    }
}
