//! log and status commands - Display the graph and where the learner is

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::session::Session;
use crate::ui::graph_view::{self, Viewport};
use crate::ui::output::{self, Verbosity};

/// Show the commit graph.
pub fn log(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.open_session()?;
    print_log(&session, json, ctx.verbosity())
}

pub fn print_log(session: &Session, json: bool, verbosity: Verbosity) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(session.graph()).context("Failed to encode graph")?;
        output::data(text);
        return Ok(());
    }

    let rendered = graph_view::render_log(session.graph());
    if rendered.is_empty() {
        output::print("No commits yet. Try: gq commit -m \"Initial commit\"", verbosity);
    } else {
        output::data(rendered);
    }
    Ok(())
}

/// Print node positions for the default viewport at `scale`.
pub fn layout(ctx: &Context, scale: f64) -> Result<()> {
    let session = ctx.open_session()?;
    let viewport = Viewport {
        scale,
        ..Viewport::default()
    };
    let positions = graph_view::layout(session.graph(), viewport);
    let text = serde_json::to_string_pretty(&positions).context("Failed to encode layout")?;
    output::data(text);
    Ok(())
}

/// Show branch, head, and lesson state.
pub fn status(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    output::data(format_status(&session));
    Ok(())
}

pub fn format_status(session: &Session) -> String {
    let graph = session.graph();
    let mut lines = Vec::new();

    if graph.is_detached() {
        let at = graph
            .current_commit
            .as_ref()
            .map(|id| id.short(7).to_string())
            .unwrap_or_default();
        lines.push(format!("HEAD detached at {} (branch {})", at, graph.current_branch));
    } else {
        lines.push(format!("On branch {}", graph.current_branch));
    }
    lines.push(format!(
        "{} commit(s), {} branch(es)",
        graph.commits.len(),
        graph.branches.len()
    ));

    let lessons = session.lessons();
    match (lessons.active_lesson(), lessons.active_progress()) {
        (Some(lesson), Some(progress)) => {
            lines.push(String::new());
            lines.push(format!(
                "Lesson: {} {}",
                lesson.title,
                output::format_progress(progress, 20)
            ));
            if let Some(step) = lessons.current_step() {
                lines.push(format!("  Step: {}", step.title));
                lines.push(format!("  {}", step.description));
                if let Some(hint) = &step.hint {
                    lines.push(format!("  Hint: {}", hint));
                }
                let state = if session.is_current_step_satisfied() {
                    "satisfied"
                } else {
                    "not yet satisfied"
                };
                lines.push(format!("  Expected: {} ({})", step.expected, state));
            }
        }
        _ => {
            lines.push(String::new());
            lines.push("No active lesson. Try: gq lesson list".to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::SessionOptions;
    use crate::store::MemoryStore;

    fn session() -> Session {
        Session::open(
            Arc::new(MemoryStore::new()),
            SessionOptions::default().manual_save(),
        )
    }

    #[test]
    fn status_without_lesson() {
        let s = session();
        let text = format_status(&s);
        assert!(text.starts_with("On branch main"));
        assert!(text.contains("No active lesson"));
    }

    #[test]
    fn status_shows_current_step() {
        let mut s = session();
        s.select_lesson("git-basics").unwrap();
        let text = format_status(&s);
        assert!(text.contains("Lesson: Git Basics"));
        assert!(text.contains("Step: Your First Commit"));
        assert!(text.contains("Expected: commit (not yet satisfied)"));
    }
}
