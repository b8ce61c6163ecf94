//! Example values: form coercion and sample derivation from schemas.
//!
//! Walking a schema follows `$ref`s, so a visited set of schema names on the
//! current path guards against cycles; re-entering a schema yields `null`.

use super::{number_value, EmitContext};
use crate::model::{ExampleForm, NodeShape, Variant};
use crate::selector::PrimitiveType;
use serde_json::{json, Map, Value};

/// Builds the value of a form example.
///
/// With a linked object schema, entered values are coerced to each field's
/// type and unset fields are filled with derived samples. Entered values with
/// no matching field are kept after the schema's fields. A linked schema that
/// is not an object yields its derived sample when nothing was entered.
pub fn form_example_value(form: &ExampleForm, ctx: &EmitContext<'_>) -> Value {
    let mut out = Map::new();
    let linked = form
        .schema
        .as_deref()
        .and_then(|name| ctx.store.schema_by_name(name));

    if let Some(node) = linked {
        if form.values.is_empty() && !matches!(node.shape, NodeShape::Object { .. }) {
            return sample_for_schema(&node.name, ctx);
        }
        let mut visited = vec![node.name.clone()];
        if let NodeShape::Object { fields } = &node.shape {
            for field in fields {
                let value = match form.values.get(&field.name) {
                    Some(raw) => coerce_form_value(raw, &field.shape, ctx),
                    None => sample_value(&field.shape, ctx, &mut visited),
                };
                out.insert(field.name.clone(), value);
            }
        }
    }

    for (name, raw) in &form.values {
        if !out.contains_key(name) {
            out.insert(name.clone(), loose_value(raw));
        }
    }
    Value::Object(out)
}

/// Derives a sample value for a named schema.
fn sample_for_schema(name: &str, ctx: &EmitContext<'_>) -> Value {
    let mut visited = Vec::new();
    sample_value(&NodeShape::reference(name), ctx, &mut visited)
}

/// Derives a sample value for a shape.
///
/// `visited` holds the schema names entered on the current path.
fn sample_value(shape: &NodeShape, ctx: &EmitContext<'_>, visited: &mut Vec<String>) -> Value {
    match shape {
        NodeShape::Primitive { ty, format } => primitive_sample(*ty, format.as_deref()),
        NodeShape::Enum { values } => values
            .iter()
            .find(|v| !v.trim().is_empty())
            .map(|v| json!(v))
            .unwrap_or_else(|| json!("")),
        NodeShape::Array { items } => json!([sample_value(items, ctx, visited)]),
        NodeShape::Object { fields } => {
            let mut obj = Map::new();
            for field in fields {
                obj.insert(field.name.clone(), sample_value(&field.shape, ctx, visited));
            }
            Value::Object(obj)
        }
        NodeShape::Ref { target } => ref_sample(target, ctx, visited),
        NodeShape::Composition { variants, .. } => match variants.first() {
            Some(Variant::Primitive { ty, format }) => primitive_sample(*ty, format.as_deref()),
            Some(Variant::Ref { target }) => ref_sample(target, ctx, visited),
            None => Value::Null,
        },
    }
}

fn ref_sample(target: &str, ctx: &EmitContext<'_>, visited: &mut Vec<String>) -> Value {
    if visited.iter().any(|v| v == target) {
        return Value::Null;
    }
    let Some(node) = ctx.store.schema_by_name(target) else {
        return Value::Null;
    };
    visited.push(target.to_string());
    let value = sample_value(&node.shape, ctx, visited);
    visited.pop();
    value
}

fn primitive_sample(ty: PrimitiveType, format: Option<&str>) -> Value {
    match ty {
        PrimitiveType::Integer => json!(0),
        PrimitiveType::Number | PrimitiveType::Double => json!(0.0),
        PrimitiveType::Boolean => json!(false),
        PrimitiveType::String => match format {
            Some("date-time") => json!("2024-01-01T00:00:00Z"),
            Some("date") => json!("2024-01-01"),
            Some("email") => json!("user@example.com"),
            Some("uuid") => json!("00000000-0000-0000-0000-000000000000"),
            Some("uri") => json!("https://example.com"),
            _ => json!("string"),
        },
    }
}

/// Coerces entered text to the JSON type of the target shape, keeping the
/// text when it does not parse.
fn coerce_form_value(raw: &str, shape: &NodeShape, ctx: &EmitContext<'_>) -> Value {
    let trimmed = raw.trim();
    match shape {
        NodeShape::Primitive { ty, .. } => match ty {
            PrimitiveType::Integer => trimmed
                .parse::<i64>()
                .map(|n| json!(n))
                .unwrap_or_else(|_| json!(raw)),
            PrimitiveType::Number | PrimitiveType::Double => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(number_value)
                .unwrap_or_else(|| json!(raw)),
            PrimitiveType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => json!(true),
                "false" => json!(false),
                _ => json!(raw),
            },
            PrimitiveType::String => json!(raw),
        },
        NodeShape::Enum { .. } => json!(raw),
        NodeShape::Ref { target } => match ctx.store.schema_by_name(target) {
            Some(node) if matches!(node.shape, NodeShape::Primitive { .. } | NodeShape::Enum { .. }) => {
                coerce_form_value(raw, &node.shape, ctx)
            }
            _ => loose_value(raw),
        },
        NodeShape::Object { .. } | NodeShape::Array { .. } | NodeShape::Composition { .. } => {
            loose_value(raw)
        }
    }
}

/// JSON if the text parses as JSON, otherwise the text itself.
fn loose_value(raw: &str) -> Value {
    serde_json::from_str(raw.trim()).unwrap_or_else(|_| json!(raw))
}
