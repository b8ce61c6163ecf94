//! Decoding of `components.schemas` and of schema nodes into shapes.

use super::{section_entries, str_prop};
use crate::document::schema_ref_name;
use crate::model::{Composition, Field, NodeShape, SchemaNode, Variant};
use crate::selector::PrimitiveType;
use serde_json::Value;
use std::collections::HashSet;

/// Imports every entry of `components.schemas`, in document order.
pub fn import_schemas(section: Option<&Value>) -> Vec<SchemaNode> {
    section_entries(section)
        .map(|(name, node)| {
            let mut schema = SchemaNode::new(name.clone(), shape_from_node(node));
            let description = str_prop(node, "description");
            if !description.is_empty() && !matches!(schema.shape, NodeShape::Ref { .. }) {
                schema.description = Some(description.to_string());
            }
            schema
        })
        .collect()
}

/// Decodes a schema node into a shape. First match wins:
///
/// 1. `$ref`
/// 2. `oneOf` / `anyOf`
/// 3. `enum`
/// 4. `type: array`
/// 5. any other `type` except `object`
/// 6. object, fields from `properties`
pub fn shape_from_node(node: &Value) -> NodeShape {
    if let Some(target) = schema_ref_name(node) {
        return NodeShape::Ref { target };
    }
    for keyword in [Composition::OneOf, Composition::AnyOf] {
        if let Some(variants) = node.get(keyword.keyword()).and_then(Value::as_array) {
            return NodeShape::Composition {
                keyword,
                variants: variants.iter().map(variant_from_node).collect(),
            };
        }
    }
    if let Some(values) = node.get("enum").and_then(Value::as_array) {
        return NodeShape::Enum {
            values: values.iter().map(enum_value_text).collect(),
        };
    }
    match node.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = node
                .get("items")
                .map(shape_from_node)
                .unwrap_or_else(|| NodeShape::primitive(PrimitiveType::String));
            NodeShape::array_of(items)
        }
        Some(ty) if ty != "object" => {
            let (ty, format) = primitive_from_node(node);
            NodeShape::Primitive { ty, format }
        }
        _ => NodeShape::Object {
            fields: fields_from_node(node),
        },
    }
}

/// Detects `{type, format}`; `number` + `double` becomes `Double` with no format.
/// Unknown types fall back to `string`.
pub fn primitive_from_node(node: &Value) -> (PrimitiveType, Option<String>) {
    let ty = PrimitiveType::from_schema(node).unwrap_or_default();
    let format = match ty {
        PrimitiveType::Double => None,
        _ => node
            .get("format")
            .and_then(Value::as_str)
            .filter(|f| !f.is_empty())
            .map(str::to_string),
    };
    (ty, format)
}

fn variant_from_node(node: &Value) -> Variant {
    if let Some(target) = schema_ref_name(node) {
        return Variant::Ref { target };
    }
    let (ty, format) = primitive_from_node(node);
    Variant::Primitive { ty, format }
}

fn fields_from_node(node: &Value) -> Vec<Field> {
    let required: HashSet<&str> = node
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    section_entries(node.get("properties"))
        .map(|(name, prop)| {
            let mut field = Field::new(name.clone(), shape_from_node(prop));
            field.required = required.contains(name.as_str());
            let description = str_prop(prop, "description");
            if !description.is_empty() && !matches!(field.shape, NodeShape::Ref { .. }) {
                field.description = Some(description.to_string());
            }
            field
        })
        .collect()
}

fn enum_value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
