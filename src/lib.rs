//! gitquest - Learn Git by driving a simulated commit graph
//!
//! gitquest simulates Git operations on an in-memory commit graph and pairs
//! the simulation with guided, step-based lessons. It is not a Git
//! implementation: commits carry only a message and a parent pointer.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to a session)
//! - [`session`] - Per-learner state owner tying the layers below together
//! - [`engine`] - Graph Engine: pure transitions for every operation
//! - [`lessons`] - Lesson Engine: catalog, predicates, and progress
//! - [`store`] - Persistence Adapter over a pluggable key/value store
//! - [`core`] - Domain types, the graph model, verification, and config
//! - [`ui`] - Output helpers and the text graph renderer
//! - [`logging`] - Diagnostic tracing setup
//!
//! # Correctness Invariants
//!
//! 1. Exactly one branch is active in every reachable state
//! 2. Every branch head, parent, and current commit id resolves
//! 3. The commit log only grows, except on reset or load
//! 4. A failed operation leaves the state untouched

pub mod cli;
pub mod core;
pub mod engine;
pub mod lessons;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
