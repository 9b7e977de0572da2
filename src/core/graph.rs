//! core::graph
//!
//! The simulated commit graph.
//!
//! # Architecture
//!
//! The graph is an append-only log of commits plus a set of named branch
//! pointers:
//! - Nodes are commits, each with at most one parent
//! - Several commits may share a parent (divergent branches)
//! - Branches point at a head commit, or at nothing before their first commit
//!
//! # Invariants
//!
//! - Exactly one branch is active, and it is `current_branch`
//! - Every head, parent, and `current_commit` id resolves to a logged commit
//! - Commits are never edited or removed
//!
//! [`crate::core::verify`] checks these; [`crate::engine`] preserves them.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::palette::MAIN_COLOR;
use super::types::{BranchColor, BranchName, CommitId, UtcTimestamp};

/// A single immutable commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commit {
    pub id: CommitId,
    pub message: String,
    pub timestamp: UtcTimestamp,
    /// Previous commit on the branch this one was appended to
    pub parent: Option<CommitId>,
    /// Branch the commit was created on
    pub branch: BranchName,
    /// Color of that branch at creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<BranchColor>,
}

/// A named, movable pointer into the commit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Branch {
    pub name: BranchName,
    /// `None` until the first commit lands on this branch
    pub head: Option<CommitId>,
    pub color: BranchColor,
    pub is_active: bool,
}

impl Branch {
    /// Create an inactive branch.
    pub fn new(name: BranchName, head: Option<CommitId>, color: BranchColor) -> Self {
        Self {
            name,
            head,
            color,
            is_active: false,
        }
    }
}

/// The whole simulated repository.
///
/// Values of this type are snapshots. Engine transitions take a snapshot by
/// reference and return a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphState {
    /// Every commit ever created, in creation order
    pub commits: Vec<Commit>,
    /// Branches keyed by name
    pub branches: BTreeMap<BranchName, Branch>,
    pub current_branch: BranchName,
    /// What the learner is looking at; may be detached from `current_branch`
    pub current_commit: Option<CommitId>,
}

impl Default for GraphState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GraphState {
    /// The canonical starting state: no commits, an active empty `main`.
    ///
    /// # Example
    ///
    /// ```
    /// use gitquest::core::graph::GraphState;
    ///
    /// let state = GraphState::initial();
    /// assert!(state.commits.is_empty());
    /// assert_eq!(state.current_branch.as_str(), "main");
    /// assert!(state.active_branch().unwrap().is_active);
    /// ```
    pub fn initial() -> Self {
        let main = BranchName::main();
        let mut branch = Branch::new(main.clone(), None, BranchColor::from_rgb(MAIN_COLOR));
        branch.is_active = true;

        Self {
            commits: Vec::new(),
            branches: BTreeMap::from([(main.clone(), branch)]),
            current_branch: main,
            current_commit: None,
        }
    }

    /// Look up a commit by exact id.
    pub fn commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.iter().find(|c| &c.id == id)
    }

    /// Look up a commit by its id string.
    pub fn commit_by_str(&self, id: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.id.as_str() == id)
    }

    /// Look up a branch by exact (case-sensitive) name.
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.values().find(|b| b.name.as_str() == name)
    }

    /// The branch named by `current_branch`.
    pub fn active_branch(&self) -> Option<&Branch> {
        self.branches.get(&self.current_branch)
    }

    /// Whether `current_commit` differs from the active branch's head.
    pub fn is_detached(&self) -> bool {
        self.active_branch()
            .is_some_and(|b| b.head != self.current_commit)
    }

    /// Walk the parent chain of a commit.
    ///
    /// Returns ancestors from the immediate parent back to the root. Stops
    /// early at an unresolvable parent or a repeated id.
    ///
    /// # Example
    ///
    /// ```
    /// use gitquest::core::graph::GraphState;
    /// use gitquest::engine::{self, SequentialStamper};
    ///
    /// let mut stamper = SequentialStamper::default();
    /// let s = engine::commit(&GraphState::initial(), "one", &mut stamper).unwrap();
    /// let s = engine::commit(&s, "two", &mut stamper).unwrap();
    ///
    /// let head = s.current_commit.clone().unwrap();
    /// let ancestors = s.ancestors(&head);
    /// assert_eq!(ancestors.len(), 1);
    /// assert_eq!(ancestors[0].message, "one");
    /// ```
    pub fn ancestors(&self, id: &CommitId) -> Vec<&Commit> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.commit(id).and_then(|c| c.parent.as_ref());

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            match self.commit(parent_id) {
                Some(parent) => {
                    result.push(parent);
                    current = parent.parent.as_ref();
                }
                None => break,
            }
        }

        result
    }

    /// Resolve user input to a commit id.
    ///
    /// Accepts an exact id, or a unique prefix of at least
    /// [`MIN_PREFIX_LEN`] characters.
    pub fn resolve_commit(&self, input: &str) -> Option<&CommitId> {
        if let Some(commit) = self.commit_by_str(input) {
            return Some(&commit.id);
        }
        if input.chars().count() < MIN_PREFIX_LEN {
            return None;
        }

        let mut matches = self
            .commits
            .iter()
            .filter(|c| c.id.as_str().starts_with(input));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(&only.id),
            _ => None,
        }
    }

    /// Whether any commit message satisfies `pred`.
    pub fn any_message(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.commits.iter().any(|c| pred(&c.message))
    }
}

/// Shortest commit-id prefix accepted by [`GraphState::resolve_commit`].
pub const MIN_PREFIX_LEN: usize = 4;
