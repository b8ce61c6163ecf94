//! Emission of `paths` and the top-level `tags` list.

use super::components::inline_parameter_value;
use super::schemas::selector_schema;
use super::{insert_text, EmitContext};
use crate::document::component_ref;
use crate::model::{Operation, OperationParameter, ResponseEntry};
use crate::selector::{ComponentKind, Selector};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

const JSON_MEDIA_TYPE: &str = "application/json";
const DEFAULT_RESPONSE_DESCRIPTION: &str = "Success";

/// Builds `paths`, grouping operations by path in first-seen order.
///
/// When two operations share method and path the later one wins.
pub fn build_paths(ctx: &EmitContext<'_>) -> Map<String, Value> {
    let mut paths = Map::new();
    let default_tags = ctx.store.default_tags();

    for op in &ctx.store.operations {
        let path = op.path.trim();
        if path.is_empty() {
            debug!(operation = %op.operation_id, "Skipping operation without a path");
            continue;
        }
        let entry = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(path_item) = entry else {
            continue;
        };

        let method_key = op.method.as_str();
        if path_item.contains_key(method_key) {
            warn!(method = %op.method, path, "Duplicate operation, the later one wins");
        }
        path_item.insert(
            method_key.to_string(),
            build_operation(op, &default_tags, ctx),
        );
    }
    paths
}

/// Collects the top-level `tags` list: every effective operation tag in
/// first-seen order, reusing the shell's tag object when one has the same name.
pub fn collect_tag_entries(ctx: &EmitContext<'_>, shell_tags: Option<&Value>) -> Vec<Value> {
    let existing: Vec<&Value> = shell_tags
        .and_then(Value::as_array)
        .map(|tags| tags.iter().collect())
        .unwrap_or_default();
    let default_tags = ctx.store.default_tags();

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for op in emitted_operations(&ctx.store.operations) {
        for name in effective_tags(op, &default_tags) {
            if !seen.insert(name.clone()) {
                continue;
            }
            let reused = existing
                .iter()
                .find(|t| t.get("name").and_then(Value::as_str) == Some(name.as_str()))
                .filter(|t| t.is_object());
            entries.push(match reused {
                Some(tag) => (*tag).clone(),
                None => json!({ "name": name }),
            });
        }
    }
    entries
}

/// Operations that end up in `paths`, in store order: no blank paths, and
/// only the last of several sharing method and path.
fn emitted_operations(operations: &[Operation]) -> Vec<&Operation> {
    let mut claimed = HashSet::new();
    let mut winners = Vec::new();
    for op in operations.iter().rev() {
        let path = op.path.trim();
        if !path.is_empty() && claimed.insert((op.method, path)) {
            winners.push(op);
        }
    }
    winners.reverse();
    winners
}

fn effective_tags(op: &Operation, default_tags: &[String]) -> Vec<String> {
    let own = op.tags();
    if own.is_empty() {
        default_tags.to_vec()
    } else {
        own
    }
}

fn build_operation(op: &Operation, default_tags: &[String], ctx: &EmitContext<'_>) -> Value {
    let mut obj = Map::new();
    obj.insert("summary".to_string(), json!(op.summary()));
    insert_text(&mut obj, "operationId", &op.operation_id);
    insert_text(&mut obj, "description", &op.description);

    let tags = effective_tags(op, default_tags);
    if !tags.is_empty() {
        obj.insert(
            "tags".to_string(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );
    }

    let params: Vec<Value> = op
        .parameters
        .iter()
        .filter_map(|p| build_parameter(p, ctx))
        .collect();
    if !params.is_empty() {
        obj.insert("parameters".to_string(), Value::Array(params));
    }

    if let Some(body) = build_request_body(&op.request, ctx) {
        obj.insert("requestBody".to_string(), body);
    }

    obj.insert("responses".to_string(), build_responses(op, ctx));
    Value::Object(obj)
}

fn build_parameter(param: &OperationParameter, ctx: &EmitContext<'_>) -> Option<Value> {
    match param {
        OperationParameter::Inline(inline) => {
            if inline.name.trim().is_empty() {
                return None;
            }
            Some(Value::Object(inline_parameter_value(inline)))
        }
        OperationParameter::Ref { ref_name } => {
            if ctx.has_parameter(ref_name) {
                Some(component_ref("parameters", ref_name))
            } else {
                debug!(parameter = %ref_name, "Dropping reference to missing parameter");
                None
            }
        }
    }
}

fn build_request_body(selector: &Selector, ctx: &EmitContext<'_>) -> Option<Value> {
    match selector {
        Selector::Component(ComponentKind::RequestBody, key) => {
            if ctx.has_component(ComponentKind::RequestBody, key) {
                Some(component_ref("requestBodies", key))
            } else {
                debug!(request_body = %key, "Dropping reference to missing request body");
                None
            }
        }
        other => {
            let schema = selector_schema(other, ctx)?;
            Some(json!({
                "required": true,
                "content": { JSON_MEDIA_TYPE: { "schema": schema } }
            }))
        }
    }
}

fn build_responses(op: &Operation, ctx: &EmitContext<'_>) -> Value {
    let mut responses = Map::new();
    if op.responses.is_empty() {
        responses.insert(
            "200".to_string(),
            response_value(DEFAULT_RESPONSE_DESCRIPTION, &op.default_response, ctx),
        );
    } else {
        for entry in &op.responses {
            responses.insert(entry.status_key().to_string(), response_entry_value(entry, ctx));
        }
    }
    Value::Object(responses)
}

fn response_entry_value(entry: &ResponseEntry, ctx: &EmitContext<'_>) -> Value {
    response_value(&entry.description, &entry.body, ctx)
}

fn response_value(description: &str, selector: &Selector, ctx: &EmitContext<'_>) -> Value {
    if let Selector::Component(ComponentKind::Response, key) = selector {
        if ctx.has_component(ComponentKind::Response, key) {
            return component_ref("responses", key);
        }
        debug!(response = %key, "Dropping reference to missing response");
    }
    let mut obj = Map::new();
    obj.insert("description".to_string(), json!(description));
    if let Some(schema) = selector_schema(selector, ctx) {
        obj.insert(
            "content".to_string(),
            json!({ JSON_MEDIA_TYPE: { "schema": schema } }),
        );
    }
    Value::Object(obj)
}
