//! reset, export, and import commands

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ui::output;

/// Reset the graph, or everything with `lessons`.
pub fn reset(ctx: &Context, lessons: bool) -> Result<()> {
    let mut session = ctx.open_session()?;
    let verbosity = ctx.verbosity();

    if lessons {
        session.reset_all().context("Failed to clear stored state")?;
        output::print("Graph and lesson progress reset.", verbosity);
    } else {
        session.reset_graph();
        session.save().context("Failed to save state")?;
        output::print("Graph reset to an empty main branch.", verbosity);
    }
    Ok(())
}

/// Print the graph as JSON.
pub fn export(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let text = serde_json::to_string_pretty(session.graph()).context("Failed to encode graph")?;
    output::data(text);
    Ok(())
}

/// Replace the graph with the contents of `file`.
pub fn import(ctx: &Context, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut session = ctx.open_session()?;
    session
        .load_graph(&text)
        .with_context(|| format!("Cannot import {}", file.display()))?;
    session.save().context("Failed to save state")?;

    output::print(
        format!(
            "Imported {} commit(s) on {} branch(es).",
            session.graph().commits.len(),
            session.graph().branches.len()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
