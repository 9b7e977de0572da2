//! lessons::predicate
//!
//! Completion checks for lesson steps.
//!
//! Every predicate is a total, side-effect-free test over a [`GraphState`].
//! An empty graph simply fails every predicate except [`Predicate::Always`].

use serde::{Deserialize, Serialize};

use crate::core::graph::GraphState;
use crate::engine::{merge_message, REVERT_PREFIX};

/// A boolean test over a graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// Some commit message contains `text`, ignoring case.
    CommitMessageContains { text: String },
    /// A branch with exactly this name exists.
    BranchExists { name: String },
    /// The active branch has exactly this name.
    ActiveBranchIs { name: String },
    /// Some commit records a merge of `source` into `target`.
    Merged { source: String, target: String },
    /// Some commit is a revert marker.
    RevertExists,
    /// Always satisfied.
    Always,
}

impl Predicate {
    pub fn commit_message_contains(text: impl Into<String>) -> Self {
        Predicate::CommitMessageContains { text: text.into() }
    }

    pub fn branch_exists(name: impl Into<String>) -> Self {
        Predicate::BranchExists { name: name.into() }
    }

    pub fn active_branch_is(name: impl Into<String>) -> Self {
        Predicate::ActiveBranchIs { name: name.into() }
    }

    pub fn merged(source: impl Into<String>, target: impl Into<String>) -> Self {
        Predicate::Merged {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Evaluate against a snapshot.
    ///
    /// # Example
    ///
    /// ```
    /// use gitquest::core::graph::GraphState;
    /// use gitquest::lessons::Predicate;
    ///
    /// let empty = GraphState::initial();
    /// assert!(Predicate::active_branch_is("main").evaluate(&empty));
    /// assert!(!Predicate::commit_message_contains("readme").evaluate(&empty));
    /// ```
    pub fn evaluate(&self, state: &GraphState) -> bool {
        match self {
            Predicate::CommitMessageContains { text } => {
                let needle = text.to_lowercase();
                state.any_message(|m| m.to_lowercase().contains(&needle))
            }
            Predicate::BranchExists { name } => state.branch(name).is_some(),
            Predicate::ActiveBranchIs { name } => state.current_branch.as_str() == name,
            Predicate::Merged { source, target } => {
                let expected = merge_message(source, target);
                state.any_message(|m| m == expected)
            }
            Predicate::RevertExists => state.any_message(|m| m.starts_with(REVERT_PREFIX)),
            Predicate::Always => true,
        }
    }
}
