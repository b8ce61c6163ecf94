#![deny(missing_docs)]

//! # Configuration
//!
//! Defaults for a fresh document shell and the workspace configuration file.

use crate::document::DocumentFormat;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Values used to build the shell of a fresh (or cleared) workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellDefaults {
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// `info.description` (omitted when empty).
    pub description: String,
    /// URL of the single default server (no `servers` when empty).
    pub server_url: String,
    /// Description of the default server.
    pub server_description: String,
}

impl Default for ShellDefaults {
    fn default() -> Self {
        Self {
            title: "OpenAPI Canvas API".to_string(),
            version: "1.0.0".to_string(),
            description: "Generated using the OpenAPI canvas".to_string(),
            server_url: "http://localhost:8080/api".to_string(),
            server_description: "Development server".to_string(),
        }
    }
}

/// Workspace configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    /// Shell defaults.
    pub shell: ShellDefaults,
    /// Comma-separated tags applied to operations without their own tags.
    pub default_tags: String,
}

impl CanvasConfig {
    /// Loads a configuration file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let format = DocumentFormat::from_hint(&path.to_string_lossy());
        Self::from_str_with_format(&content, format)
    }

    /// Parses configuration text.
    pub fn from_str_with_format(content: &str, format: DocumentFormat) -> AppResult<Self> {
        match format {
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| AppError::General(format!("Invalid config JSON: {}", e))),
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AppError::General(format!("Invalid config YAML: {}", e))),
        }
    }
}
