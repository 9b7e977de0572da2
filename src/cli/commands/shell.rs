//! shell command - Interactive session with debounced autosave
//!
//! Runs on a tokio runtime so the session's autosave can debounce bursts of
//! commands. Leaving the shell writes any save still pending.

use std::io::Write as _;

use anyhow::{bail, Context as _, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{git_ops, lesson, log_cmd};
use crate::cli::args::LessonAction;
use crate::cli::Context;
use crate::engine::Operation;
use crate::session::{Session, SessionOptions};
use crate::ui::output::{self, Verbosity};

const HELP: &str = "\
Graph:    commit <message> | branch <name> | merge <branch> | checkout <target>
          revert <commit> | issue <title>
View:     log | status
Lessons:  lesson list | lesson start <id> | next | prev | check | lesson reset
Session:  save | reset | help | quit";

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Quit,
}

/// Run the interactive shell.
pub fn shell(ctx: &Context) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(ctx))
}

async fn run(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_with(&config, SessionOptions::from_config(&config))?;
    let verbosity = ctx.verbosity();

    output::print("gitquest shell. Type `help` for commands, `quit` to leave.", verbosity);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if verbosity != Verbosity::Quiet {
            print!("gq> ");
            let _ = std::io::stdout().flush();
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match interpret(&mut session, &line, verbosity) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Quit) => break,
            Err(err) => output::error(format!("{:#}", err)),
        }
    }

    if !session.options().autosave {
        session.save().context("Failed to save state")?;
    }
    Ok(())
}

/// Execute one shell line.
pub fn interpret(session: &mut Session, line: &str, verbosity: Verbosity) -> Result<ShellFlow> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let op = match word {
        "" => return Ok(ShellFlow::Continue),
        "quit" | "exit" => return Ok(ShellFlow::Quit),
        "help" => {
            output::data(HELP);
            return Ok(ShellFlow::Continue);
        }
        "commit" => Operation::Commit {
            message: rest.to_string(),
        },
        "branch" => Operation::Branch {
            name: rest.to_string(),
        },
        "merge" => Operation::Merge {
            source: rest.to_string(),
        },
        "checkout" => Operation::Checkout {
            target: rest.to_string(),
        },
        "revert" => Operation::Revert {
            commit: rest.to_string(),
        },
        "issue" => Operation::Issue {
            title: rest.to_string(),
            description: String::new(),
        },
        "log" => {
            log_cmd::print_log(session, rest == "--json", verbosity)?;
            return Ok(ShellFlow::Continue);
        }
        "status" => {
            output::data(log_cmd::format_status(session));
            return Ok(ShellFlow::Continue);
        }
        "lesson" | "next" | "prev" | "check" => {
            let action = lesson_action(word, rest)?;
            lesson::execute(session, &action, verbosity)?;
            return Ok(ShellFlow::Continue);
        }
        "save" => {
            session.save().context("Failed to save state")?;
            output::print("Saved.", verbosity);
            return Ok(ShellFlow::Continue);
        }
        "reset" => {
            session.reset_graph();
            output::print("Graph reset to an empty main branch.", verbosity);
            return Ok(ShellFlow::Continue);
        }
        other => bail!("unknown command '{}' (try `help`)", other),
    };

    git_ops::execute(session, op, verbosity)?;
    Ok(ShellFlow::Continue)
}

fn lesson_action(word: &str, rest: &str) -> Result<LessonAction> {
    let (sub, arg) = match word {
        "lesson" => match rest.split_once(char::is_whitespace) {
            Some((sub, arg)) => (sub, arg.trim()),
            None => (rest, ""),
        },
        shortcut => (shortcut, ""),
    };

    Ok(match sub {
        "list" | "" => LessonAction::List,
        "start" if !arg.is_empty() => LessonAction::Start { id: arg.to_string() },
        "start" => bail!("usage: lesson start <id>"),
        "next" => LessonAction::Next,
        "prev" => LessonAction::Prev,
        "check" => LessonAction::Check,
        "reset" => LessonAction::Reset,
        other => bail!("unknown lesson command '{}'", other),
    })
}
