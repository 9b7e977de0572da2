//! core
//!
//! Core domain types and configuration for gitquest.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitId, BranchColor, UtcTimestamp
//! - [`graph`] - The simulated commit graph and read-only queries
//! - [`verify`] - Graph invariant verification
//! - [`palette`] - Branch color assignment
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Graph values are snapshots; only the engine produces new ones
//! - All verification is deterministic

pub mod config;
pub mod graph;
pub mod palette;
pub mod types;
pub mod verify;
