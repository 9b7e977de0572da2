//! engine::operation
//!
//! The closed set of learner operations.
//!
//! Matching on [`Operation`] is exhaustive, so adding a kind forces every
//! consumer (engine, lessons, CLI) to handle it.

use serde::{Deserialize, Serialize};

/// A single Git-like action with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Append a commit to the active branch.
    Commit { message: String },
    /// Fork a new branch at the current head and switch to it.
    Branch { name: String },
    /// Record a merge of `source` into the active branch.
    Merge { source: String },
    /// Switch to a branch, or view a commit detached.
    Checkout { target: String },
    /// Record a revert of an existing commit.
    Revert { commit: String },
    /// File an issue. Logged only; never changes the graph.
    Issue { title: String, description: String },
}

impl Operation {
    /// The payload-free kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Commit { .. } => OperationKind::Commit,
            Operation::Branch { .. } => OperationKind::Branch,
            Operation::Merge { .. } => OperationKind::Merge,
            Operation::Checkout { .. } => OperationKind::Checkout,
            Operation::Revert { .. } => OperationKind::Revert,
            Operation::Issue { .. } => OperationKind::Issue,
        }
    }
}

/// Operation kinds, as referenced by lesson steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Commit,
    Branch,
    Merge,
    Checkout,
    Revert,
    Issue,
}

impl OperationKind {
    /// All kinds, in toolbar order.
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Commit,
        OperationKind::Branch,
        OperationKind::Merge,
        OperationKind::Checkout,
        OperationKind::Revert,
        OperationKind::Issue,
    ];

    /// Lowercase name, as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Commit => "commit",
            OperationKind::Branch => "branch",
            OperationKind::Merge => "merge",
            OperationKind::Checkout => "checkout",
            OperationKind::Revert => "revert",
            OperationKind::Issue => "issue",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
