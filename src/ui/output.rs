//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Learner-facing output is formatted here and respects `--quiet`.
//! Diagnostics belong to `tracing`, not to these helpers.

use std::fmt::Display;

use crate::lessons::{LessonEvent, LessonProgress};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors and requested data only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - normal output plus diagnostics
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print data the user asked for (always shown).
pub fn data(message: impl Display) {
    println!("{}", message);
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// A text progress bar, e.g. `[######----] 3/5`.
///
/// ```
/// use gitquest::lessons::LessonProgress;
/// use gitquest::ui::output::format_progress;
///
/// let p = LessonProgress {
///     lesson_id: "git-basics".into(),
///     current_step: 2,
///     completed: false,
///     total_steps: 4,
///     progress: 0.5,
/// };
/// assert_eq!(format_progress(&p, 8), "[####----] step 2/4");
/// ```
pub fn format_progress(progress: &LessonProgress, width: usize) -> String {
    let filled = ((progress.progress.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(width - filled));
    if progress.completed {
        format!("[{}] completed", bar)
    } else {
        format!(
            "[{}] step {}/{}",
            bar, progress.current_step, progress.total_steps
        )
    }
}

/// One-line description of a lesson movement.
pub fn format_lesson_event(event: &LessonEvent) -> String {
    match event {
        LessonEvent::Advanced { lesson_id, step } => {
            format!("lesson '{}': moved to step {}", lesson_id, step)
        }
        LessonEvent::Completed { lesson_id } => format!("lesson '{}' completed!", lesson_id),
    }
}
