#![deny(missing_docs)]

//! # Default Tags Command

use crate::context::Context;
use crate::error::CliResult;

/// Arguments for the default-tags command.
#[derive(clap::Args, Debug, Clone)]
pub struct DefaultTagsArgs {
    /// Comma-separated tags for operations that have none of their own.
    /// An empty string clears them.
    pub tags: String,
}

/// Replaces the workspace's default tags.
pub fn execute(args: &DefaultTagsArgs, ctx: &Context) -> CliResult<()> {
    let mut orchestrator = ctx.open()?;
    orchestrator.set_default_tags(args.tags.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas_canvas_core::model::{HttpMethod, Operation};
    use oas_canvas_core::CanvasConfig;

    #[test]
    fn test_default_tags_apply_to_untagged_operations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            workspace: dir.path().join("ws"),
            config: CanvasConfig::default(),
        };
        ctx.open()
            .unwrap()
            .mutate(|store| {
                store.add_operation(Operation::new(HttpMethod::Get, "/health"));
                Ok(())
            })
            .unwrap();

        execute(
            &DefaultTagsArgs {
                tags: " ops , , infra".into(),
            },
            &ctx,
        )
        .unwrap();

        let orch = ctx.open().unwrap();
        assert_eq!(orch.store().default_tags(), vec!["ops", "infra"]);
        assert!(orch.document_text().contains("- ops"));
    }
}
