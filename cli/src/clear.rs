#![deny(missing_docs)]

//! # Clear Command

use crate::context::Context;
use crate::error::CliResult;

/// Resets the workspace to an empty store and the default document.
pub fn execute(ctx: &Context) -> CliResult<()> {
    let mut orchestrator = ctx.open()?;
    orchestrator.clear()?;
    println!("Cleared workspace {}", ctx.workspace.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas_canvas_core::model::SchemaNode;
    use oas_canvas_core::CanvasConfig;

    #[test]
    fn test_clear_empties_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            workspace: dir.path().join("ws"),
            config: CanvasConfig::default(),
        };
        ctx.open()
            .unwrap()
            .mutate(|store| store.add(SchemaNode::object("Temp", vec![])))
            .unwrap();

        execute(&ctx).unwrap();

        let orch = ctx.open().unwrap();
        assert!(orch.store().is_empty());
        assert!(!orch.document_text().contains("Temp"));
    }
}
