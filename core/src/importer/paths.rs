//! Decoding of `paths` into operations.

use super::components::{inline_parameter_from_node, operation_body_schema};
use super::{section_entries, str_prop};
use crate::document::extract_component_name;
use crate::model::{
    synthesize_operation_id, HttpMethod, Operation, OperationParameter, ResponseEntry,
};
use crate::selector::Selector;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_RESPONSE_DESCRIPTION: &str = "Success";

/// Imports every operation under `paths`, in document order.
///
/// Only `get`, `post`, `put`, `patch`, `delete`, `head` and `options` are read.
pub fn import_paths(section: Option<&Value>) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (path, item) in section_entries(section) {
        let Some(item_map) = item.as_object() else {
            continue;
        };
        let shared: Vec<&Value> = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| params.iter().collect())
            .unwrap_or_default();

        for (key, node) in item_map {
            let Ok(method) = HttpMethod::from_str(key) else {
                if !matches!(
                    key.as_str(),
                    "parameters" | "summary" | "description" | "servers"
                ) && !key.starts_with("x-")
                {
                    debug!(path = %path, key = %key, "Skipping unsupported path item key");
                }
                continue;
            };
            if !node.is_object() {
                continue;
            }
            operations.push(import_operation(method, path, node, &shared));
        }
    }
    operations
}

fn import_operation(method: HttpMethod, path: &str, node: &Value, shared: &[&Value]) -> Operation {
    let mut op = Operation::new(method, path);

    match node.get("operationId").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => op.operation_id = id.to_string(),
        _ => {
            op.operation_id = synthesize_operation_id(method, path);
            debug!(operation = %op.operation_id, "Synthesized missing operationId");
        }
    }
    op.description = str_prop(node, "description").to_string();
    op.tags_text = node
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let own: Vec<&Value> = node
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| params.iter().collect())
        .unwrap_or_default();
    let overridden = |p: &Value| {
        own.iter().any(|o| {
            o.get("$ref").is_none()
                && str_prop(o, "name") == str_prop(p, "name")
                && str_prop(o, "in") == str_prop(p, "in")
        })
    };
    let inherited = shared
        .iter()
        .copied()
        .filter(|p| p.get("$ref").is_some() || !overridden(p));
    op.parameters = own
        .iter()
        .copied()
        .chain(inherited)
        .filter_map(import_parameter)
        .collect();

    if let Some(body) = node.get("requestBody") {
        op.request = request_selector(body);
    }

    import_responses(&mut op, node.get("responses"));
    op
}

fn import_parameter(node: &Value) -> Option<OperationParameter> {
    if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
        return match extract_component_name(reference, "parameters") {
            Some(ref_name) => Some(OperationParameter::Ref { ref_name }),
            None => {
                debug!(reference, "Skipping parameter reference outside components.parameters");
                None
            }
        };
    }
    if !node.is_object() {
        return None;
    }
    Some(OperationParameter::Inline(inline_parameter_from_node(node)))
}

fn request_selector(body: &Value) -> Selector {
    if let Some(key) = body
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| extract_component_name(r, "requestBodies"))
    {
        return Selector::request_body(key);
    }
    operation_body_schema(body)
        .map(Selector::from_schema_node)
        .unwrap_or_default()
}

fn response_selector(response: &Value) -> Selector {
    if let Some(key) = response
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| extract_component_name(r, "responses"))
    {
        return Selector::response(key);
    }
    operation_body_schema(response)
        .map(Selector::from_schema_node)
        .unwrap_or_default()
}

/// A `200` with a body becomes the default response selector. It is also kept
/// as an explicit entry unless it is the sole response and described as
/// `Success`, so every status code survives re-emission.
fn import_responses(op: &mut Operation, responses: Option<&Value>) {
    let Some(responses) = responses.and_then(Value::as_object) else {
        return;
    };
    let sole = responses.len() == 1;

    for (status, response) in responses {
        let selector = response_selector(response);
        let description = str_prop(response, "description");
        if status == "200" {
            if !selector.is_none() {
                op.default_response = selector.clone();
            }
            let plain = response.get("$ref").is_none();
            if sole && plain && description == DEFAULT_RESPONSE_DESCRIPTION {
                continue;
            }
        }
        let status = if status == "default" { "" } else { status.as_str() };
        op.responses
            .push(ResponseEntry::new(status, description, selector));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterLocation;
    use crate::selector::PrimitiveType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_only_known_methods_are_imported() {
        let ops = import_paths(Some(&json!({
            "/users": {
                "summary": "Users",
                "get": {"operationId": "listUsers", "responses": {}},
                "trace": {"responses": {}},
                "post": {"tags": ["users", "admin"]}
            }
        })));
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].operation_id, "listUsers");
        assert_eq!(ops[1].method, HttpMethod::Post);
        assert_eq!(ops[1].operation_id, "post_users");
        assert_eq!(ops[1].tags_text, "users, admin");
    }

    #[test]
    fn test_path_parameters_are_merged() {
        let ops = import_paths(Some(&json!({
            "/users/{id}": {
                "parameters": [
                    {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
                    {"$ref": "#/components/parameters/Trace"}
                ],
                "get": {
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
                    ]
                }
            }
        })));
        let params = &ops[0].parameters;
        assert_eq!(params.len(), 2);
        let OperationParameter::Inline(id) = &params[0] else {
            panic!("expected inline parameter");
        };
        assert_eq!(id.location, ParameterLocation::Path);
        assert_eq!(id.schema.ty, PrimitiveType::Integer);
        assert_eq!(
            params[1],
            OperationParameter::Ref {
                ref_name: "Trace".into()
            }
        );
    }

    #[test]
    fn test_request_body_selectors() {
        let ops = import_paths(Some(&json!({
            "/a": {
                "post": {"requestBody": {"$ref": "#/components/requestBodies/NewA"}},
                "put": {"requestBody": {"content": {"application/x-www-form-urlencoded": {"schema": {"$ref": "#/components/schemas/A"}}}}},
                "patch": {"requestBody": {"content": {"text/plain": {"schema": {"type": "string"}}}}}
            }
        })));
        assert_eq!(ops[0].request, Selector::request_body("NewA"));
        assert_eq!(ops[1].request, Selector::schema("A"));
        assert_eq!(ops[2].request, Selector::None);
    }

    #[test]
    fn test_sole_success_response_becomes_default() {
        let ops = import_paths(Some(&json!({
            "/users": {"get": {"responses": {"200": {
                "description": "Success",
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/User"}}}
            }}}}
        })));
        assert_eq!(ops[0].default_response, Selector::schema("User"));
        assert!(ops[0].responses.is_empty());
    }

    #[test]
    fn test_mixed_responses_keep_every_status() {
        let ops = import_paths(Some(&json!({
            "/users": {"get": {"responses": {
                "200": {"description": "OK", "content": {"application/json": {"schema": {"type": "number", "format": "double"}}}},
                "404": {"$ref": "#/components/responses/NotFound"},
                "default": {"description": "Error"}
            }}}
        })));
        let op = &ops[0];
        assert_eq!(op.default_response, Selector::Primitive(PrimitiveType::Double));
        assert_eq!(
            op.responses,
            vec![
                ResponseEntry::new("200", "OK", Selector::Primitive(PrimitiveType::Double)),
                ResponseEntry::new("404", "", Selector::response("NotFound")),
                ResponseEntry::new("", "Error", Selector::None),
            ]
        );
    }
}
