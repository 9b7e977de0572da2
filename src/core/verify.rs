//! core::verify
//!
//! Graph invariant verification.
//!
//! # Checks
//!
//! - `current_branch` names an existing branch
//! - Exactly one branch is active, and it is `current_branch`
//! - Each branch is stored under its own name
//! - Commit ids are unique
//! - Every `parent`, branch head, and `current_commit` resolves
//!
//! # Invariants
//!
//! - Never mutates the state
//! - Must be deterministic

use std::collections::HashSet;

use thiserror::Error;

use super::graph::GraphState;

/// A single invariant violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("current branch '{0}' does not exist")]
    CurrentBranchMissing(String),

    #[error("expected exactly one active branch, found {0}")]
    ActiveCount(usize),

    #[error("active branch '{active}' is not the current branch '{current}'")]
    ActiveMismatch { active: String, current: String },

    #[error("branch stored under '{key}' is named '{name}'")]
    KeyMismatch { key: String, name: String },

    #[error("duplicate commit id: {0}")]
    DuplicateCommit(String),

    #[error("commit '{commit}' has unknown parent '{parent}'")]
    DanglingParent { commit: String, parent: String },

    #[error("branch '{branch}' points at unknown commit '{head}'")]
    DanglingHead { branch: String, head: String },

    #[error("current commit '{0}' does not exist")]
    DanglingCurrent(String),
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }

    /// All error messages joined with `; `.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Check every graph invariant.
pub fn verify(state: &GraphState) -> VerifyResult {
    let mut errors = Vec::new();

    if !state.branches.contains_key(&state.current_branch) {
        errors.push(VerifyError::CurrentBranchMissing(
            state.current_branch.to_string(),
        ));
    }

    let active: Vec<_> = state.branches.values().filter(|b| b.is_active).collect();
    match active.as_slice() {
        [only] if only.name != state.current_branch => {
            errors.push(VerifyError::ActiveMismatch {
                active: only.name.to_string(),
                current: state.current_branch.to_string(),
            });
        }
        [_] => {}
        _ => errors.push(VerifyError::ActiveCount(active.len())),
    }

    for (key, branch) in &state.branches {
        if key != &branch.name {
            errors.push(VerifyError::KeyMismatch {
                key: key.to_string(),
                name: branch.name.to_string(),
            });
        }
    }

    let mut ids = HashSet::new();
    for commit in &state.commits {
        if !ids.insert(&commit.id) {
            errors.push(VerifyError::DuplicateCommit(commit.id.to_string()));
        }
    }

    for commit in &state.commits {
        if let Some(parent) = &commit.parent {
            if !ids.contains(parent) {
                errors.push(VerifyError::DanglingParent {
                    commit: commit.id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    for branch in state.branches.values() {
        if let Some(head) = &branch.head {
            if !ids.contains(head) {
                errors.push(VerifyError::DanglingHead {
                    branch: branch.name.to_string(),
                    head: head.to_string(),
                });
            }
        }
    }

    if let Some(current) = &state.current_commit {
        if !ids.contains(current) {
            errors.push(VerifyError::DanglingCurrent(current.to_string()));
        }
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}
