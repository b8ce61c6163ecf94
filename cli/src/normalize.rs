#![deny(missing_docs)]

//! # Normalize Command
//!
//! Imports a document and emits it back without touching any workspace.
//! The output is the canonical form the engine would produce.

use crate::error::{CliError, CliResult};
use oas_canvas_core::{emit, import_document, parse_document, serialize_document, DocumentFormat};
use std::fs;
use std::path::PathBuf;

/// Arguments for the normalize command.
#[derive(clap::Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Document to normalize.
    #[clap(long)]
    pub input: PathBuf,

    /// Output path. Defaults to stdout, in the input's format.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Normalizes document text. The input format follows `input_hint`,
/// the output format follows `output_hint`.
pub fn normalize_text(text: &str, input_hint: &str, output_hint: &str) -> CliResult<String> {
    let doc = parse_document(text, DocumentFormat::from_hint(input_hint))?;
    let store = import_document(&doc)?;
    let emitted = emit(&store, &doc)?;
    Ok(serialize_document(
        &emitted,
        DocumentFormat::from_hint(output_hint),
    )?)
}

/// Executes the normalization.
pub fn execute(args: &NormalizeArgs) -> CliResult<()> {
    let text = fs::read_to_string(&args.input).map_err(|e| {
        CliError::General(format!("Failed to read {}: {}", args.input.display(), e))
    })?;
    let input_hint = args.input.to_string_lossy();
    let output_hint = args
        .output
        .as_ref()
        .map(|p| p.to_string_lossy())
        .unwrap_or_else(|| input_hint.clone());

    let normalized = normalize_text(&text, &input_hint, &output_hint)?;
    match &args.output {
        Some(path) => fs::write(path, normalized)?,
        None => print!("{}", normalized),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
openapi: 3.0.0
info:
  title: Inventory
  version: 1.0.0
paths:
  /items:
    parameters:
      - name: page
        in: query
        schema:
          type: integer
    get:
      responses:
        '200':
          description: Success
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Gone'
"#;

    #[test]
    fn test_normalize_canonicalizes() {
        let out = normalize_text(SPEC, "in.yaml", "out.json").unwrap();
        let doc = parse_document(&out, DocumentFormat::Json).unwrap();
        let get = &doc["paths"]["/items"]["get"];
        assert_eq!(get["operationId"], "get_items");
        assert_eq!(get["summary"], "GET /items");
        assert_eq!(get["parameters"][0]["name"], "page");
        assert_eq!(
            get["responses"]["200"],
            serde_json::json!({"description": "Success"})
        );
        assert!(doc["paths"]["/items"].get("parameters").is_none());
    }

    #[test]
    fn test_normalize_is_stable() {
        let once = normalize_text(SPEC, "in.yaml", "out.yaml").unwrap();
        let twice = normalize_text(&once, "in.yaml", "out.yaml").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        let output = dir.path().join("api.normalized.yaml");
        fs::write(&input, SPEC).unwrap();
        execute(&NormalizeArgs {
            input,
            output: Some(output.clone()),
        })
        .unwrap();
        assert!(fs::read_to_string(output).unwrap().contains("get_items"));
    }
}
