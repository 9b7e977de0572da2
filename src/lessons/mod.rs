//! lessons
//!
//! The Lesson Engine: guided, step-based lessons over the commit graph.
//!
//! # Modules
//!
//! - [`predicate`] - Completion checks evaluated against a graph snapshot
//! - [`catalog`] - Lesson and step definitions, plus the built-in lessons
//! - [`progress`] - Per-lesson cursors and the [`LessonTracker`]
//!
//! # Example
//!
//! ```
//! use gitquest::core::graph::GraphState;
//! use gitquest::engine::{self, SequentialStamper};
//! use gitquest::lessons::LessonTracker;
//!
//! let mut tracker = LessonTracker::builtin();
//! tracker.select("git-basics").unwrap();
//!
//! let state = engine::commit(&GraphState::initial(), "Initial commit", &mut SequentialStamper::default()).unwrap();
//! assert!(tracker.is_current_step_satisfied(&state));
//! tracker.advance(&state);
//! assert_eq!(tracker.active_progress().unwrap().current_step, 2);
//! ```

pub mod catalog;
pub mod predicate;
pub mod progress;

pub use catalog::{Lesson, LessonStep};
pub use predicate::Predicate;
pub use progress::{LessonError, LessonEvent, LessonProgress, LessonTracker};
