//! config command - Set or list configuration values

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, GlobalConfig};
use crate::ui::output;

/// Set a configuration value and write the file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let path = Config::write_path().context("Failed to locate config file")?;
    let mut global = if path.exists() {
        Config::load_from(&path)
            .context("Failed to load config")?
            .global
    } else {
        GlobalConfig::default()
    };

    Config::set(&mut global, key, value)?;
    Config::write_to(&path, &global).context("Failed to write config")?;

    output::print(format!("Set {} = {}", key, value), ctx.verbosity());
    Ok(())
}

/// List effective configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    match config.loaded_from() {
        Some(path) => output::data(format!("# Loaded from {}", path.display())),
        None => output::data("# No config file; showing defaults"),
    }
    let store = ctx
        .resolve_store_path(&config)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    output::data(format!("store_path = {}", store));
    output::data(format!("autosave = {}", config.autosave()));
    output::data(format!("debounce_ms = {}", config.debounce().as_millis()));
    output::data(format!("lessons.auto_advance = {}", config.auto_advance()));
    Ok(())
}
