#![deny(missing_docs)]

//! # Import Command
//!
//! Replaces the workspace contents with an existing OpenAPI document.

use crate::context::Context;
use crate::error::{CliError, CliResult};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the import command.
#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// OpenAPI document to import (`.json` is read as JSON, anything else as YAML).
    #[clap(long)]
    pub input: PathBuf,
}

/// Executes the import.
pub fn execute(args: &ImportArgs, ctx: &Context) -> CliResult<()> {
    let content = fs::read_to_string(&args.input).map_err(|e| {
        CliError::General(format!("Failed to read {}: {}", args.input.display(), e))
    })?;
    let mut orchestrator = ctx.open()?;
    orchestrator.import_text(&content, &args.input.to_string_lossy())?;

    let store = orchestrator.store();
    info!(
        schemas = store.schemas.len(),
        operations = store.operations.len(),
        "Imported {}",
        args.input.display()
    );
    Ok(())
}
