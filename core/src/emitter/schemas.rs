//! Emission of `components.schemas` and of every schema fragment that a
//! shape or selector resolves to.

use super::{insert_text, EmitContext};
use crate::document::component_ref;
use crate::model::{Field, NodeShape, SchemaNode, Variant};
use crate::selector::Selector;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Builds `components.schemas`, one entry per schema, in store order.
pub fn build_schemas(ctx: &EmitContext<'_>) -> Map<String, Value> {
    let mut out = Map::new();
    for node in &ctx.store.schemas {
        out.insert(node.name.clone(), schema_node_value(node, ctx));
    }
    out
}

/// Renders one named schema.
///
/// A schema-level reference that no longer resolves degrades to `{type: object}`.
pub fn schema_node_value(node: &SchemaNode, ctx: &EmitContext<'_>) -> Value {
    let mut value = shape_value(&node.shape, ctx).unwrap_or_else(|| {
        debug!(schema = %node.name, "Schema shape unresolved, emitting bare object");
        json!({ "type": "object" })
    });
    if let (Some(desc), Value::Object(obj)) = (&node.description, &mut value) {
        if !obj.contains_key("$ref") {
            insert_text(obj, "description", desc);
        }
    }
    value
}

/// Renders a shape, or `None` when it depends on a schema that does not exist.
pub fn shape_value(shape: &NodeShape, ctx: &EmitContext<'_>) -> Option<Value> {
    match shape {
        NodeShape::Object { fields } => Some(object_value(fields, ctx)),
        NodeShape::Array { items } => {
            let items = shape_value(items, ctx)?;
            Some(json!({ "type": "array", "items": items }))
        }
        NodeShape::Enum { values } => {
            let values: Vec<Value> = values
                .iter()
                .filter(|v| !v.trim().is_empty())
                .map(|v| json!(v))
                .collect();
            Some(json!({ "type": "string", "enum": values }))
        }
        NodeShape::Primitive { ty, format } => Some(ty.schema_value(format.as_deref())),
        NodeShape::Ref { target } => schema_ref(target, ctx),
        NodeShape::Composition { keyword, variants } => {
            let emitted: Vec<Value> = variants
                .iter()
                .filter_map(|v| variant_value(v, ctx))
                .collect();
            // An empty list stays empty; only a list emptied by dangling refs degrades.
            if emitted.is_empty() && !variants.is_empty() {
                return None;
            }
            let mut obj = Map::new();
            obj.insert(keyword.keyword().to_string(), Value::Array(emitted));
            Some(Value::Object(obj))
        }
    }
}

/// Resolves a body selector to a schema fragment.
///
/// Component selectors are not schemas and resolve to `None`.
pub fn selector_schema(selector: &Selector, ctx: &EmitContext<'_>) -> Option<Value> {
    match selector {
        Selector::None | Selector::Component(..) => None,
        Selector::Primitive(ty) => Some(ty.schema_value(None)),
        Selector::Schema(name) => schema_ref(name, ctx),
    }
}

fn schema_ref(name: &str, ctx: &EmitContext<'_>) -> Option<Value> {
    if ctx.has_schema(name) {
        Some(component_ref("schemas", name))
    } else {
        debug!(target_schema = %name, "Dropping reference to missing schema");
        None
    }
}

fn variant_value(variant: &Variant, ctx: &EmitContext<'_>) -> Option<Value> {
    match variant {
        Variant::Primitive { ty, format } => Some(ty.schema_value(format.as_deref())),
        Variant::Ref { target } => schema_ref(target, ctx),
    }
}

fn object_value(fields: &[Field], ctx: &EmitContext<'_>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            continue;
        }
        if properties.contains_key(name) {
            debug!(field = %name, "Dropping duplicate field");
            continue;
        }
        let Some(value) = field_value(field, ctx) else {
            debug!(field = %name, "Dropping field with unresolved shape");
            continue;
        };
        properties.insert(name.to_string(), value);
        if field.required {
            required.push(json!(name));
        }
    }

    let mut obj = Map::new();
    obj.insert("type".to_string(), json!("object"));
    if !properties.is_empty() {
        obj.insert("properties".to_string(), Value::Object(properties));
    }
    if !required.is_empty() {
        obj.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(obj)
}

fn field_value(field: &Field, ctx: &EmitContext<'_>) -> Option<Value> {
    let mut value = shape_value(&field.shape, ctx)?;
    if let (Some(desc), Value::Object(obj)) = (&field.description, &mut value) {
        if !obj.contains_key("$ref") {
            insert_text(obj, "description", desc);
        }
    }
    Some(value)
}
