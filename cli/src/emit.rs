#![deny(missing_docs)]

//! # Emit Command
//!
//! Re-derives the document from the workspace and writes it out.

use crate::context::Context;
use crate::error::CliResult;
use oas_canvas_core::{parse_document, serialize_document, DocumentFormat};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the emit command.
#[derive(clap::Args, Debug, Clone)]
pub struct EmitArgs {
    /// Output path. `.json` writes JSON, anything else YAML.
    /// Prints YAML to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the emit.
pub fn execute(args: &EmitArgs, ctx: &Context) -> CliResult<()> {
    let mut orchestrator = ctx.open()?;
    orchestrator.sync()?;
    let text = orchestrator.document_text();

    match &args.output {
        Some(path) => {
            let format = DocumentFormat::from_hint(&path.to_string_lossy());
            let content = match format {
                DocumentFormat::Yaml => text.to_string(),
                DocumentFormat::Json => {
                    serialize_document(&parse_document(text, DocumentFormat::Yaml)?, format)?
                }
            };
            fs::write(path, content)?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
