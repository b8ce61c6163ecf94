#![deny(missing_docs)]

//! # Workspace Context
//!
//! Resolves the global flags into a configuration and a workspace directory,
//! and opens the persisted workspace behind them.

use crate::error::CliResult;
use oas_canvas_core::{CanvasConfig, DirBlobStore, Orchestrator};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default workspace directory, relative to the current directory.
pub const DEFAULT_WORKSPACE_DIR: &str = ".oas-canvas";

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding the persisted workspace blobs.
    pub workspace: PathBuf,
    /// Loaded configuration (defaults when no file was given).
    pub config: CanvasConfig,
}

impl Context {
    /// Builds the context, loading `config_path` when present.
    pub fn load(workspace: PathBuf, config_path: Option<&PathBuf>) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                CanvasConfig::load(path)?
            }
            None => CanvasConfig::default(),
        };
        Ok(Self { workspace, config })
    }

    /// Opens the workspace, restoring persisted state.
    ///
    /// A workspace with no entities and no default tags picks up the
    /// configured default tags.
    pub fn open(&self) -> CliResult<Orchestrator<DirBlobStore>> {
        let blobs = DirBlobStore::open(&self.workspace)?;
        let mut orchestrator = Orchestrator::hydrate(blobs, self.config.shell.clone())?;
        let store = orchestrator.store();
        if store.is_empty()
            && store.default_tags_text.is_empty()
            && !self.config.default_tags.trim().is_empty()
        {
            info!(tags = %self.config.default_tags, "Applying configured default tags");
            orchestrator.set_default_tags(self.config.default_tags.clone())?;
        }
        Ok(orchestrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_config_tags_seed_empty_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("canvas.yaml");
        fs::write(
            &config_path,
            "shell:\n  title: Billing\ndefaultTags: billing\n",
        )
        .unwrap();

        let ctx = Context::load(dir.path().join("ws"), Some(&config_path)).unwrap();
        assert_eq!(ctx.config.shell.title, "Billing");

        let orch = ctx.open().unwrap();
        assert_eq!(orch.store().default_tags_text, "billing");
        assert!(orch.document_text().contains("Billing"));
    }

    #[test]
    fn test_missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(Context::load(dir.path().to_path_buf(), Some(&missing)).is_err());
    }
}
