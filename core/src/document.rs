#![deny(missing_docs)]

//! # Document Text Boundary
//!
//! Everything that touches the serialized OpenAPI document as text: format
//! detection, parsing into a `serde_json::Value`, serialization back to YAML or
//! JSON, the default document shell and `$ref` pointer helpers.

use crate::config::ShellDefaults;
use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// YAML (also accepts plain JSON, which is a YAML subset).
    #[default]
    Yaml,
    /// JSON.
    Json,
}

impl DocumentFormat {
    /// Picks the parser from a file name hint: `.json` is JSON, anything else YAML.
    pub fn from_hint(hint: &str) -> Self {
        let is_json = Path::new(hint)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// Parses document text into a JSON value.
///
/// Fails with `AppError::Import` on malformed input or when the root is not a mapping.
pub fn parse_document(text: &str, format: DocumentFormat) -> AppResult<Value> {
    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| AppError::Import(format!("Failed to parse JSON: {}", e)))?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| AppError::Import(format!("Failed to parse YAML: {}", e)))?,
    };
    if !value.is_object() {
        return Err(AppError::Import(
            "Failed to parse document: root is not a mapping".to_string(),
        ));
    }
    Ok(value)
}

/// Serializes a document in the requested format.
pub fn serialize_document(doc: &Value, format: DocumentFormat) -> AppResult<String> {
    match format {
        DocumentFormat::Yaml => serde_yaml::to_string(doc)
            .map_err(|e| AppError::General(format!("YAML serialization failed: {}", e))),
        DocumentFormat::Json => serde_json::to_string_pretty(doc)
            .map_err(|e| AppError::General(format!("JSON serialization failed: {}", e))),
    }
}

/// Builds the shell of a fresh workspace: `openapi`, `info`, `servers`, empty `paths`.
pub fn default_shell(defaults: &ShellDefaults) -> Value {
    let mut info = Map::new();
    info.insert("title".to_string(), json!(defaults.title));
    info.insert("version".to_string(), json!(defaults.version));
    if !defaults.description.is_empty() {
        info.insert("description".to_string(), json!(defaults.description));
    }

    let mut doc = Map::new();
    doc.insert("openapi".to_string(), json!(crate::OPENAPI_VERSION));
    doc.insert("info".to_string(), Value::Object(info));
    if !defaults.server_url.is_empty() {
        let mut server = Map::new();
        server.insert("url".to_string(), json!(defaults.server_url));
        if !defaults.server_description.is_empty() {
            server.insert("description".to_string(), json!(defaults.server_description));
        }
        doc.insert("servers".to_string(), json!([Value::Object(server)]));
    }
    doc.insert("paths".to_string(), json!({}));
    Value::Object(doc)
}

/// Renders `{$ref: "#/components/<section>/<name>"}`.
pub fn component_ref(section: &str, name: &str) -> Value {
    json!({ "$ref": format!("#/components/{}/{}", section, encode_pointer_segment(name)) })
}

/// Extracts the component name from a local `$ref` pointing to
/// `#/components/{section}/{name}`.
///
/// Returns `None` for external references or other sections.
pub fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Name of the schema a node's `$ref` points to.
///
/// Local `#/components/schemas/*` pointers are decoded; any other reference
/// falls back to its last path segment.
pub fn schema_ref_name(node: &Value) -> Option<String> {
    let ref_str = node.get("$ref").and_then(Value::as_str)?;
    extract_component_name(ref_str, "schemas").or_else(|| {
        ref_str
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(decode_pointer_segment)
    })
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Encodes a JSON Pointer segment (escapes `~` and `/`).
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_hint() {
        assert_eq!(DocumentFormat::from_hint("spec.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_hint("spec.JSON"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_hint("spec.yml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_hint("openapi"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_parse_rejects_malformed_and_scalar_roots() {
        assert!(matches!(
            parse_document("paths: [unclosed", DocumentFormat::Yaml),
            Err(AppError::Import(_))
        ));
        assert!(matches!(
            parse_document("just a string", DocumentFormat::Yaml),
            Err(AppError::Import(_))
        ));
        assert!(matches!(
            parse_document("{\"openapi\": ", DocumentFormat::Json),
            Err(AppError::Import(_))
        ));
    }

    #[test]
    fn test_default_shell_shape() {
        let shell = default_shell(&ShellDefaults::default());
        let keys: Vec<&String> = shell.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["openapi", "info", "servers", "paths"]);
        assert_eq!(shell["openapi"], json!("3.0.0"));
    }

    #[test]
    fn test_extract_component_name() {
        assert_eq!(
            extract_component_name("#/components/parameters/Limit", "parameters").as_deref(),
            Some("Limit")
        );
        assert!(extract_component_name("#/components/responses/Limit", "parameters").is_none());
        assert!(extract_component_name("other.yaml#/components/parameters/Limit", "parameters")
            .is_none());
    }

    #[test]
    fn test_pointer_segments_round_trip() {
        let name = "User Profile/details~v2";
        let encoded = encode_pointer_segment(name);
        assert_eq!(encoded, "User Profile~1details~0v2");
        assert_eq!(decode_pointer_segment(&encoded), name);
        assert_eq!(decode_pointer_segment("User%20Profile"), "User Profile");
    }

    #[test]
    fn test_schema_ref_name_fallback() {
        assert_eq!(
            schema_ref_name(&json!({"$ref": "#/components/schemas/Pet"})).as_deref(),
            Some("Pet")
        );
        assert_eq!(
            schema_ref_name(&json!({"$ref": "models.yaml#/Pet"})).as_deref(),
            Some("Pet")
        );
        assert!(schema_ref_name(&json!({"type": "string"})).is_none());
    }
}
