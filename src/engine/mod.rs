//! engine
//!
//! The Graph Engine: pure transitions over [`GraphState`].
//!
//! # Architecture
//!
//! Every learner action is an [`Operation`]. The engine maps
//! `(state, operation)` to either a new state or an [`EngineError`]:
//!
//! ```text
//! GraphState --apply(op)--> Ok(GraphState) | Err(EngineError)
//! ```
//!
//! Transitions never mutate their input. Commit ids and timestamps come from
//! a [`Stamper`], so a [`SequentialStamper`] makes whole sessions
//! reproducible.
//!
//! # Invariants
//!
//! - Exactly one branch is active after every successful transition
//! - Every id the engine writes resolves within the same state
//! - The commit log is append-only (except [`reset`] and [`load`])
//! - A failed transition has no effect
//!
//! # Example
//!
//! ```
//! use gitquest::core::graph::GraphState;
//! use gitquest::engine::{apply, Operation, SequentialStamper};
//!
//! let mut stamper = SequentialStamper::default();
//! let state = apply(
//!     &GraphState::initial(),
//!     &Operation::Commit { message: "Initial commit".into() },
//!     &mut stamper,
//! )
//! .unwrap();
//! let state = apply(&state, &Operation::Branch { name: "feature".into() }, &mut stamper).unwrap();
//! assert_eq!(state.current_branch.as_str(), "feature");
//! ```
//!
//! [`GraphState`]: crate::core::graph::GraphState

pub mod error;
pub mod operation;
pub mod stamp;
pub mod transitions;

pub use error::EngineError;
pub use operation::{Operation, OperationKind};
pub use stamp::{SequentialStamper, Stamper, SystemStamper};
pub use transitions::{
    apply, checkout, commit, create_branch, create_issue, load, load_json, merge, merge_message,
    reset, revert, revert_message, REVERT_PREFIX,
};
