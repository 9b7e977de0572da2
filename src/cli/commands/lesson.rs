//! lesson command - List, start, and step through lessons

use anyhow::{Context as _, Result};

use crate::cli::args::LessonAction;
use crate::cli::Context;
use crate::session::Session;
use crate::ui::output::{self, Verbosity};

/// Run a lesson subcommand on a one-shot session.
pub fn lesson(ctx: &Context, action: LessonAction) -> Result<()> {
    let mut session = ctx.open_session()?;
    let changed = execute(&mut session, &action, ctx.verbosity())?;
    if changed {
        session.save().context("Failed to save state")?;
    }
    Ok(())
}

/// Run a lesson subcommand. Returns whether session state changed.
pub fn execute(session: &mut Session, action: &LessonAction, verbosity: Verbosity) -> Result<bool> {
    match action {
        LessonAction::List => {
            output::data(format_list(session));
            Ok(false)
        }
        LessonAction::Start { id } => {
            session.select_lesson(id)?;
            output::print(format_current(session), verbosity);
            Ok(true)
        }
        LessonAction::Next => match session.advance_lesson() {
            Some(event) => {
                output::print(output::format_lesson_event(&event), verbosity);
                output::print(format_current(session), verbosity);
                Ok(true)
            }
            None => {
                output::print(stuck_reason(session), verbosity);
                Ok(false)
            }
        },
        LessonAction::Prev => {
            let moved = session.retreat_lesson();
            if moved {
                output::print(format_current(session), verbosity);
            } else {
                output::print("Already at the first step.", verbosity);
            }
            Ok(moved)
        }
        LessonAction::Check => {
            if session.lessons().active_id().is_none() {
                output::print("No active lesson. Try: gq lesson start <id>", verbosity);
            } else if session.is_current_step_satisfied() {
                output::data("Current step is satisfied.");
            } else {
                output::data("Current step is not yet satisfied.");
            }
            Ok(false)
        }
        LessonAction::Reset => {
            session.reset_lessons();
            output::print("Lesson progress reset.", verbosity);
            Ok(true)
        }
    }
}

fn format_list(session: &Session) -> String {
    let tracker = session.lessons();
    tracker
        .lessons()
        .iter()
        .map(|lesson| {
            let marker = if tracker.active_id() == Some(lesson.id.as_str()) {
                "*"
            } else {
                " "
            };
            let progress = tracker
                .progress(&lesson.id)
                .map(|p| output::format_progress(p, 10))
                .unwrap_or_default();
            format!("{} {:<18} {:<26} {}", marker, lesson.id, lesson.title, progress)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_current(session: &Session) -> String {
    let tracker = session.lessons();
    let (Some(lesson), Some(progress)) = (tracker.active_lesson(), tracker.active_progress())
    else {
        return "No active lesson.".to_string();
    };

    if progress.completed {
        return format!("{}: completed!", lesson.title);
    }

    let mut text = format!(
        "{} - step {}/{}",
        lesson.title, progress.current_step, progress.total_steps
    );
    if let Some(step) = tracker.current_step() {
        text.push_str(&format!("\n  {}\n  {}", step.title, step.description));
        if let Some(hint) = &step.hint {
            text.push_str(&format!("\n  Hint: {}", hint));
        }
    }
    text
}

fn stuck_reason(session: &Session) -> &'static str {
    match session.lessons().active_progress() {
        None => "No active lesson. Try: gq lesson start <id>",
        Some(p) if p.completed => "This lesson is already completed.",
        Some(_) => "Complete the current step before finishing the lesson.",
    }
}
