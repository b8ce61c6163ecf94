#![deny(missing_docs)]

//! # Document Emitter
//!
//! Derives an OpenAPI 3.0 document from an `EntityStore`.
//!
//! The emitter starts from the current document shell so hand-edited keys it
//! does not own (`info`, `servers`, extensions, ...) survive, then replaces the
//! owned sections wholesale:
//!
//! - `paths` (always present)
//! - `components.{schemas, parameters, responses, headers, requestBodies, examples, securitySchemes}`
//! - `tags`
//!
//! Owned sections that come out empty are removed. References that no longer
//! resolve are dropped rather than reported.

pub mod components;
pub mod paths;
pub mod samples;
pub mod schemas;

use crate::config::ShellDefaults;
use crate::error::{AppError, AppResult};
use crate::model::{
    EntityStore, ReusableHeader, ReusableParameter, ReusableRequestBody, ReusableResponse,
};
use crate::selector::ComponentKind;
use serde_json::{json, Map, Value};
use tracing::debug;

/// `components.*` sections the emitter owns.
pub const OWNED_COMPONENT_SECTIONS: [&str; 7] = [
    "schemas",
    "parameters",
    "responses",
    "headers",
    "requestBodies",
    "examples",
    "securitySchemes",
];

/// Read-only lookups used while emitting.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    /// The store being emitted.
    pub store: &'a EntityStore,
}

impl<'a> EmitContext<'a> {
    /// Wraps a store.
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// Whether `components.schemas.<name>` will be emitted.
    pub fn has_schema(&self, name: &str) -> bool {
        self.store.has_schema(name)
    }

    /// Whether a reusable response or request body with this key exists.
    pub fn has_component(&self, kind: ComponentKind, key: &str) -> bool {
        match kind {
            ComponentKind::Response => self.store.find::<ReusableResponse>(key).is_some(),
            ComponentKind::RequestBody => self.store.find::<ReusableRequestBody>(key).is_some(),
        }
    }

    /// Whether a reusable parameter with this key exists.
    pub fn has_parameter(&self, key: &str) -> bool {
        self.store.find::<ReusableParameter>(key).is_some()
    }

    /// Whether a reusable header with this key exists.
    pub fn has_header(&self, key: &str) -> bool {
        self.store.find::<ReusableHeader>(key).is_some()
    }
}

/// Emits the document for `store` on top of `shell`.
///
/// Fails only when the shell is not a mapping.
pub fn emit(store: &EntityStore, shell: &Value) -> AppResult<Value> {
    let Value::Object(shell) = shell else {
        return Err(AppError::Shell(
            "Document shell must be a mapping".to_string(),
        ));
    };
    let ctx = EmitContext::new(store);
    let mut doc = shell.clone();

    doc.entry("openapi".to_string())
        .or_insert_with(|| json!(crate::OPENAPI_VERSION));
    if !doc.get("info").is_some_and(Value::is_object) {
        let defaults = ShellDefaults::default();
        doc.insert(
            "info".to_string(),
            json!({ "title": defaults.title, "version": defaults.version }),
        );
    }

    doc.insert("paths".to_string(), Value::Object(paths::build_paths(&ctx)));

    let mut components = match doc.get("components") {
        Some(Value::Object(existing)) => existing.clone(),
        _ => Map::new(),
    };
    let sections = [
        ("schemas", schemas::build_schemas(&ctx)),
        ("parameters", components::build_parameters(&ctx)),
        ("responses", components::build_responses(&ctx)),
        ("headers", components::build_headers(&ctx)),
        ("requestBodies", components::build_request_bodies(&ctx)),
        ("examples", components::build_examples(&ctx)),
        ("securitySchemes", components::build_security_schemes(&ctx)),
    ];
    for (section, entries) in sections {
        if entries.is_empty() {
            components.remove(section);
        } else {
            components.insert(section.to_string(), Value::Object(entries));
        }
    }
    if components.is_empty() {
        doc.remove("components");
    } else {
        doc.insert("components".to_string(), Value::Object(components));
    }

    let tags = paths::collect_tag_entries(&ctx, doc.get("tags"));
    if tags.is_empty() {
        doc.remove("tags");
    } else {
        doc.insert("tags".to_string(), Value::Array(tags));
    }

    debug!(
        operations = store.operations.len(),
        schemas = store.schemas.len(),
        "Emitted document"
    );
    Ok(Value::Object(doc))
}

/// Renders a number, using an integer when the value is integral.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

/// Inserts `key: text` when `text` is not blank.
pub(crate) fn insert_text(obj: &mut Map<String, Value>, key: &str, text: &str) {
    if !text.trim().is_empty() {
        obj.insert(key.to_string(), json!(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, HttpMethod, NodeShape, Operation, SchemaNode};
    use crate::selector::{PrimitiveType, Selector};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_rejects_non_mapping_shell() {
        let store = EntityStore::new();
        assert!(matches!(
            emit(&store, &json!(["not", "a", "map"])),
            Err(AppError::Shell(_))
        ));
    }

    #[test]
    fn test_emit_fills_missing_root_keys() {
        let doc = emit(&EntityStore::new(), &json!({})).unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));
        assert!(doc["info"]["title"].is_string());
        assert_eq!(doc["paths"], json!({}));
        assert!(doc.get("components").is_none());
        assert!(doc.get("tags").is_none());
    }

    #[test]
    fn test_emit_preserves_unowned_keys_and_replaces_owned() {
        let shell = json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "2"},
            "servers": [{"url": "https://api.example.com"}],
            "x-owner": "team",
            "paths": {"/stale": {"get": {}}},
            "components": {
                "schemas": {"Stale": {"type": "object"}},
                "links": {"Keep": {"operationId": "x"}}
            }
        });
        let mut store = EntityStore::new();
        store
            .add(SchemaNode::object(
                "Pet",
                vec![Field::new("id", NodeShape::primitive(PrimitiveType::Integer))],
            ))
            .unwrap();
        let mut op = Operation::new(HttpMethod::Get, "/pets");
        op.default_response = Selector::schema("Pet");
        store.add_operation(op);

        let doc = emit(&store, &shell).unwrap();
        assert_eq!(doc["openapi"], json!("3.0.3"));
        assert_eq!(doc["x-owner"], json!("team"));
        assert_eq!(doc["servers"][0]["url"], json!("https://api.example.com"));
        assert!(doc["paths"].get("/stale").is_none());
        assert!(doc["components"]["schemas"].get("Stale").is_none());
        assert_eq!(doc["components"]["links"]["Keep"]["operationId"], json!("x"));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["openapi", "info", "servers", "x-owner", "paths", "components"]
        );
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(-0.0), json!(0));
    }
}
