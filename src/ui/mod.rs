//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`graph_view`] - Commit graph layout and text log rendering

pub mod graph_view;
pub mod output;
