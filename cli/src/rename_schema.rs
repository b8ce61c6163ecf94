#![deny(missing_docs)]

//! # Rename Schema Command

use crate::context::Context;
use crate::error::CliResult;

/// Arguments for the rename-schema command.
#[derive(clap::Args, Debug, Clone)]
pub struct RenameSchemaArgs {
    /// Current schema name.
    #[clap(long)]
    pub from: String,

    /// New schema name.
    #[clap(long)]
    pub to: String,
}

/// Renames the schema and rewrites every reference to it.
pub fn execute(args: &RenameSchemaArgs, ctx: &Context) -> CliResult<()> {
    let mut orchestrator = ctx.open()?;
    let rewritten = orchestrator.rename_schema(&args.from, &args.to)?;
    println!(
        "Renamed '{}' to '{}' ({} references updated)",
        args.from,
        args.to.trim(),
        rewritten
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use oas_canvas_core::model::{Field, NodeShape, SchemaNode};
    use oas_canvas_core::CanvasConfig;

    fn context(dir: &tempfile::TempDir) -> Context {
        Context {
            workspace: dir.path().join("ws"),
            config: CanvasConfig::default(),
        }
    }

    #[test]
    fn test_rename_persists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        ctx.open()
            .unwrap()
            .mutate(|store| {
                store.add(SchemaNode::object("Item", vec![]))?;
                store.add(SchemaNode::object(
                    "Cart",
                    vec![Field::new("item", NodeShape::reference("Item"))],
                ))?;
                Ok(())
            })
            .unwrap();

        let args = RenameSchemaArgs {
            from: "Item".into(),
            to: "Product".into(),
        };
        execute(&args, &ctx).unwrap();

        let orch = ctx.open().unwrap();
        assert!(orch.store().find::<SchemaNode>("Product").is_some());
        assert!(orch.document_text().contains("#/components/schemas/Product"));
    }

    #[test]
    fn test_rename_unknown_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenameSchemaArgs {
            from: "Ghost".into(),
            to: "Spirit".into(),
        };
        assert!(matches!(
            execute(&args, &context(&dir)),
            Err(CliError::App(_))
        ));
    }
}
