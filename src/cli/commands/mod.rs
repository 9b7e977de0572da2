//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a session over the configured store
//! 2. Applies the change through the session
//! 3. Formats and displays output, then saves
//!
//! Handlers never edit graph or lesson state directly.
//!
//! # Async Commands
//!
//! Only `shell` runs on a tokio runtime, which it builds itself so the
//! session can debounce its autosave. One-shot commands stay synchronous.

mod completion;
mod config_cmd;
mod git_ops;
mod lesson;
mod log_cmd;
mod shell;
mod state;

pub use completion::completion;
pub use config_cmd::{list as config_list, set as config_set};
pub use lesson::lesson;
pub use log_cmd::{log, status};
pub use shell::shell;
pub use state::{export, import, reset};

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use crate::engine::Operation;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Graph operations
        Command::Commit { message } => git_ops::run(ctx, Operation::Commit { message }),
        Command::Branch { name } => git_ops::run(ctx, Operation::Branch { name }),
        Command::Merge { source } => git_ops::run(ctx, Operation::Merge { source }),
        Command::Checkout { target } => git_ops::run(ctx, Operation::Checkout { target }),
        Command::Revert { commit } => git_ops::run(ctx, Operation::Revert { commit }),
        Command::Issue { title, description } => {
            git_ops::run(ctx, Operation::Issue { title, description })
        }

        // Inspection
        Command::Log {
            json,
            layout,
            scale,
        } => {
            if layout {
                log_cmd::layout(ctx, scale)
            } else {
                log_cmd::log(ctx, json)
            }
        }
        Command::Status => log_cmd::status(ctx),

        // State management
        Command::Reset { lessons } => state::reset(ctx, lessons),
        Command::Export => state::export(ctx),
        Command::Import { file } => state::import(ctx, &file),

        // Lessons
        Command::Lesson { action } => lesson::lesson(ctx, action),

        // Setup
        Command::Config { action } => match action {
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Shell => shell::shell(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}
