#![deny(missing_docs)]

//! # OAS Canvas CLI
//!
//! Command Line Interface for the OpenAPI canvas workspace.
//!
//! Supported Commands:
//! - `import`: Replace the workspace with an existing document.
//! - `emit`: Write the document derived from the workspace.
//! - `normalize`: Import and re-emit a document without a workspace.
//! - `rename-schema`: Rename a schema and every reference to it.
//! - `default-tags`: Set tags for operations without their own.
//! - `clear`: Reset the workspace.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::context::{Context, DEFAULT_WORKSPACE_DIR};
use crate::error::CliResult;

mod clear;
mod context;
mod default_tags;
mod emit;
mod error;
mod import;
mod normalize;
mod rename_schema;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI canvas workspace CLI")]
struct Cli {
    /// Workspace directory holding the persisted store and document.
    #[clap(long, global = true, env = "OAS_CANVAS_WORKSPACE", default_value = DEFAULT_WORKSPACE_DIR)]
    workspace: PathBuf,

    /// Configuration file (YAML or JSON) with shell defaults and default tags.
    #[clap(long, global = true, env = "OAS_CANVAS_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import an OpenAPI document, replacing the workspace contents.
    Import(import::ImportArgs),
    /// Write the document derived from the workspace.
    Emit(emit::EmitArgs),
    /// Import and re-emit a document without touching the workspace.
    Normalize(normalize::NormalizeArgs),
    /// Rename a schema and rewrite every reference to it.
    RenameSchema(rename_schema::RenameSchemaArgs),
    /// Set the default tags.
    DefaultTags(default_tags::DefaultTagsArgs),
    /// Reset the workspace to an empty store and the default document.
    Clear,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Normalize(args) = &cli.command {
        return normalize::execute(args);
    }

    let ctx = Context::load(cli.workspace.clone(), cli.config.as_ref())?;
    match &cli.command {
        Commands::Import(args) => import::execute(args, &ctx)?,
        Commands::Emit(args) => emit::execute(args, &ctx)?,
        Commands::RenameSchema(args) => rename_schema::execute(args, &ctx)?,
        Commands::DefaultTags(args) => default_tags::execute(args, &ctx)?,
        Commands::Clear => clear::execute(&ctx)?,
        Commands::Normalize(_) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "oas-canvas",
            "rename-schema",
            "--from",
            "A",
            "--to",
            "B",
            "--workspace",
            "/tmp/ws",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.workspace, PathBuf::from("/tmp/ws"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::RenameSchema(ref a) if a.from == "A" && a.to == "B"));
    }

    #[test]
    fn test_default_tags_takes_positional_text() {
        let cli = Cli::try_parse_from(["oas-canvas", "default-tags", "a, b"]).unwrap();
        assert!(matches!(cli.command, Commands::DefaultTags(ref a) if a.tags == "a, b"));
    }
}
