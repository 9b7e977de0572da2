//! Graph operation commands: commit, branch, merge, checkout, revert, issue

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::engine::Operation;
use crate::session::{Applied, Session};
use crate::ui::output::{self, Verbosity};

/// Apply `op` to a one-shot session and save.
pub fn run(ctx: &Context, op: Operation) -> Result<()> {
    let mut session = ctx.open_session()?;
    execute(&mut session, op, ctx.verbosity())?;
    session.save().context("Failed to save state")?;
    Ok(())
}

/// Apply `op` and describe the result.
///
/// Shared by one-shot commands and the interactive shell.
pub fn execute(session: &mut Session, op: Operation, verbosity: Verbosity) -> Result<()> {
    let applied = session.apply(op.clone())?;
    output::print(describe(session, &op), verbosity);
    if matches!(op, Operation::Checkout { .. }) && session.graph().is_detached() {
        output::warn(
            format!(
                "detached HEAD; new commits still go on '{}'",
                session.graph().current_branch
            ),
            verbosity,
        );
    }
    report(&applied, verbosity);
    Ok(())
}

/// Print lesson movement caused by an operation.
pub fn report(applied: &Applied, verbosity: Verbosity) {
    if let Some(event) = &applied.lesson {
        output::print(output::format_lesson_event(event), verbosity);
    }
}

fn describe(session: &Session, op: &Operation) -> String {
    let graph = session.graph();
    let head_line = || match graph.commits.last() {
        Some(c) => format!("[{} {}] {}", c.branch, c.id.short(7), c.message),
        None => String::new(),
    };

    match op {
        Operation::Commit { .. } | Operation::Merge { .. } | Operation::Revert { .. } => {
            head_line()
        }
        Operation::Branch { name } => format!("Switched to a new branch '{}'", name),
        Operation::Checkout { .. } if graph.is_detached() => {
            match graph.current_commit.as_ref().and_then(|id| graph.commit(id)) {
                Some(c) => format!("HEAD is now at {} {}", c.id.short(7), c.message),
                None => "HEAD is detached".to_string(),
            }
        }
        Operation::Checkout { .. } => format!("Switched to branch '{}'", graph.current_branch),
        Operation::Issue { title, .. } => format!("Issue filed: {}", title),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::SequentialStamper;
    use crate::session::SessionOptions;
    use crate::store::MemoryStore;

    fn session() -> Session {
        Session::open(
            Arc::new(MemoryStore::new()),
            SessionOptions::default().manual_save(),
        )
        .with_stamper(SequentialStamper::default())
    }

    #[test]
    fn describes_commit_with_branch_and_short_id() {
        let mut s = session();
        let op = Operation::Commit {
            message: "hello".into(),
        };
        s.apply(op.clone()).unwrap();
        assert_eq!(describe(&s, &op), "[main c000000] hello");
    }

    #[test]
    fn describes_detached_checkout() {
        let mut s = session();
        s.commit("one").unwrap();
        s.commit("two").unwrap();
        let op = Operation::Checkout {
            target: "c0000001".into(),
        };
        s.apply(op.clone()).unwrap();
        assert_eq!(describe(&s, &op), "HEAD is now at c000000 one");
    }

    #[test]
    fn execute_propagates_engine_errors() {
        let mut s = session();
        let err = execute(
            &mut s,
            Operation::Merge {
                source: "ghost".into(),
            },
            Verbosity::Quiet,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
