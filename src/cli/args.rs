//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--store <path>`: Use this state file instead of the configured one
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitquest - Learn Git by driving a simulated commit graph
#[derive(Parser, Debug)]
#[command(name = "gq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// State file to read and write (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    // ========== Graph operations ==========
    /// Record a commit on the current branch
    #[command(
        name = "commit",
        after_help = "\
EXAMPLES:
    gq commit -m \"Initial commit\"
    gq commit -m \"Add README file\""
    )]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Create a branch at the current head and switch to it
    Branch {
        /// New branch name
        name: String,
    },

    /// Merge a branch into the current branch
    #[command(
        long_about = "Merge a branch into the current branch.\n\n\
            Records one commit on the current branch with the message \
            \"Merge branch '<source>' into <target>\". The source branch is \
            left where it is."
    )]
    Merge {
        /// Branch to merge from
        source: String,
    },

    /// Switch to a branch or view a commit
    #[command(
        after_help = "\
EXAMPLES:
    gq checkout feature       # switch branches
    gq checkout c0a1b2c3      # view a commit (detached)"
    )]
    Checkout {
        /// Branch name, commit id, or unique id prefix
        target: String,
    },

    /// Record a commit that reverts an earlier one
    Revert {
        /// Commit id or unique id prefix
        commit: String,
    },

    /// File an issue (does not change the graph)
    Issue {
        /// Issue title
        title: String,

        /// Issue description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    // ========== Inspection ==========
    /// Show the commit graph, newest first
    Log {
        /// Print the graph as JSON
        #[arg(long, conflicts_with = "layout")]
        json: bool,

        /// Print node positions for a viewport as JSON
        #[arg(long)]
        layout: bool,

        /// Viewport scale used with --layout
        #[arg(long, default_value_t = 1.0, requires = "layout")]
        scale: f64,
    },

    /// Show the current branch and lesson
    Status,

    // ========== State management ==========
    /// Reset the graph to a single empty main branch
    Reset {
        /// Also reset all lesson progress and clear the store
        #[arg(long)]
        lessons: bool,
    },

    /// Print the graph as JSON
    Export,

    /// Replace the graph with one read from a JSON file
    Import {
        /// File produced by `gq export`
        file: PathBuf,
    },

    // ========== Lessons ==========
    /// Guided lessons
    Lesson {
        #[command(subcommand)]
        action: LessonAction,
    },

    // ========== Setup ==========
    /// Get, set, or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Interactive session with debounced autosave
    #[command(
        after_help = "\
Inside the shell, type a command and its argument on one line:
    commit Initial commit
    branch feature
    lesson start git-basics
Type `help` for the full list and `quit` to leave."
    )]
    Shell,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lesson subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LessonAction {
    /// List lessons with progress
    List,
    /// Make a lesson active
    Start {
        /// Lesson id
        id: String,
    },
    /// Advance the active lesson
    Next,
    /// Go back one step
    Prev,
    /// Check whether the current step is satisfied
    Check,
    /// Reset all lesson progress
    Reset,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
