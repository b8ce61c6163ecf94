#![deny(missing_docs)]

//! # Document Importer
//!
//! Decomposes an OpenAPI 3.0 document into an `EntityStore`.
//!
//! Import is forgiving: anything the model does not cover is ignored, and a
//! document missing `paths` or `components` imports as much as is present.
//! Only text that does not parse, or a root that is not a mapping, is an error.

pub mod components;
pub mod paths;
pub mod schemas;

use crate::document::{parse_document, DocumentFormat};
use crate::error::{AppError, AppResult};
use crate::model::EntityStore;
use serde_json::{Map, Value};
use tracing::info;

/// Parses document text (JSON when `hint` ends in `.json`, YAML otherwise) and imports it.
pub fn import_text(text: &str, hint: &str) -> AppResult<EntityStore> {
    let doc = parse_document(text, DocumentFormat::from_hint(hint))?;
    import_document(&doc)
}

/// Imports a parsed document.
pub fn import_document(doc: &Value) -> AppResult<EntityStore> {
    let Value::Object(root) = doc else {
        return Err(AppError::Import(
            "Failed to parse document: root is not a mapping".to_string(),
        ));
    };

    let empty = Map::new();
    let components = root
        .get("components")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let store = EntityStore {
        schemas: schemas::import_schemas(components.get("schemas")),
        operations: paths::import_paths(root.get("paths")),
        parameters: components::import_parameters(components.get("parameters")),
        responses: components::import_responses(components.get("responses")),
        headers: components::import_headers(components.get("headers")),
        request_bodies: components::import_request_bodies(components.get("requestBodies")),
        examples: components::import_examples(components.get("examples")),
        security_schemes: components::import_security_schemes(components.get("securitySchemes")),
        ..EntityStore::default()
    };

    info!(
        schemas = store.schemas.len(),
        operations = store.operations.len(),
        parameters = store.parameters.len(),
        responses = store.responses.len(),
        "Imported document"
    );
    Ok(store)
}

/// Iterates the entries of an optional mapping section.
pub(crate) fn section_entries(section: Option<&Value>) -> impl Iterator<Item = (&String, &Value)> {
    section
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.iter())
}

/// A string property, or `""`.
pub(crate) fn str_prop<'a>(node: &'a Value, key: &str) -> &'a str {
    node.get(key).and_then(Value::as_str).unwrap_or_default()
}
