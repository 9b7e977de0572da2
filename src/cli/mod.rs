//! cli
//!
//! Command-line interface layer for gitquest.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Open a [`Session`] over the configured store
//! - Delegate to command handlers and report results
//!
//! # Architecture
//!
//! The CLI layer is thin. Every graph or lesson change goes through
//! [`Session`]; handlers only format what comes back.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::logging;
use crate::session::{Session, SessionOptions};
use crate::store::FileStore;
use crate::ui::output::Verbosity;

/// Execution context derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// State file override.
    pub store_path: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Load configuration from the standard locations.
    pub fn config(&self) -> Result<Config> {
        Config::load().context("Failed to load config")
    }

    /// The state file: `--store`, then config, then the default.
    pub fn resolve_store_path(&self, config: &Config) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => config
                .store_path()
                .context("Failed to determine the state file location"),
        }
    }

    /// Open a session that saves only when told to.
    ///
    /// One-shot commands use this and call [`Session::save`] after a change.
    pub fn open_session(&self) -> Result<Session> {
        let config = self.config()?;
        let options = SessionOptions::from_config(&config).manual_save();
        self.open_with(&config, options)
    }

    /// Open a session with the given options.
    pub fn open_with(&self, config: &Config, options: SessionOptions) -> Result<Session> {
        let path = self.resolve_store_path(config)?;
        let store = FileStore::with_path(path);
        Ok(Session::open(Arc::new(store), options))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.debug);

    let ctx = Context {
        store_path: cli.store.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
