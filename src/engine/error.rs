//! engine::error
//!
//! Recoverable failures of graph operations.
//!
//! Every variant is an expected domain condition. Callers surface it to the
//! learner and keep the previous state; nothing here is a crash.

use thiserror::Error;

use crate::core::types::TypeError;

/// Errors from Graph Engine transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A branch with this exact name already exists.
    #[error("branch '{0}' already exists")]
    DuplicateBranch(String),

    /// No branch has this name.
    #[error("branch '{0}' does not exist")]
    UnknownBranch(String),

    /// The branch exists but has no commits yet.
    #[error("branch '{0}' has no commits")]
    EmptyBranch(String),

    /// Neither a branch name nor a commit id.
    #[error("'{0}' is neither a branch nor a commit")]
    UnknownTarget(String),

    /// No commit has this id.
    #[error("commit '{0}' does not exist")]
    UnknownCommit(String),

    /// A required argument was empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A state handed to `load` breaks a graph invariant.
    #[error("malformed state: {0}")]
    MalformedState(String),
}

impl From<TypeError> for EngineError {
    fn from(err: TypeError) -> Self {
        EngineError::InvalidArgument(err.to_string())
    }
}
