//! Emission of the reusable component sections other than `schemas`.

use super::samples::form_example_value;
use super::schemas::selector_schema;
use super::{insert_text, number_value, EmitContext};
use crate::document::component_ref;
use crate::model::{
    BodySchema, ExampleValue, HeaderSource, InlineParameter, ParameterLocation, ReusableExample,
    ReusableHeader, ReusableParameter, ReusableRequestBody, ReusableResponse, ValueSchema,
};
use crate::selector::Selector;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// `components.parameters`
pub fn build_parameters(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .parameters
        .iter()
        .map(|p| (p.key.clone(), reusable_parameter_value(p)))
        .collect()
}

/// `components.headers`
pub fn build_headers(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .headers
        .iter()
        .map(|h| (h.key.clone(), reusable_header_value(h)))
        .collect()
}

/// `components.responses`
pub fn build_responses(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .responses
        .iter()
        .map(|r| (r.key.clone(), reusable_response_value(r, ctx)))
        .collect()
}

/// `components.requestBodies`
pub fn build_request_bodies(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .request_bodies
        .iter()
        .map(|b| (b.key.clone(), reusable_request_body_value(b, ctx)))
        .collect()
}

/// `components.examples`
pub fn build_examples(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .examples
        .iter()
        .map(|e| (e.key.clone(), example_value(e, ctx)))
        .collect()
}

/// `components.securitySchemes`, definitions copied verbatim.
pub fn build_security_schemes(ctx: &EmitContext<'_>) -> Map<String, Value> {
    ctx.store
        .security_schemes
        .iter()
        .map(|s| (s.key.clone(), Value::Object(s.definition.clone())))
        .collect()
}

/// Renders a value schema with its validations.
///
/// `double` becomes `number` + `format: double`; blank enum entries are dropped.
pub fn value_schema_value(schema: &ValueSchema) -> Value {
    let mut obj = Map::new();
    schema.ty.write_schema(&mut obj, schema.format.as_deref());

    let values: Vec<Value> = schema
        .enum_values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| json!(v))
        .collect();
    if !values.is_empty() {
        obj.insert("enum".to_string(), Value::Array(values));
    }
    if let Some(n) = schema.min_length {
        obj.insert("minLength".to_string(), json!(n));
    }
    if let Some(n) = schema.max_length {
        obj.insert("maxLength".to_string(), json!(n));
    }
    if let Some(pattern) = schema.pattern.as_deref().filter(|p| !p.is_empty()) {
        obj.insert("pattern".to_string(), json!(pattern));
    }
    if let Some(n) = schema.minimum {
        obj.insert("minimum".to_string(), number_value(n));
    }
    if let Some(n) = schema.maximum {
        obj.insert("maximum".to_string(), number_value(n));
    }
    Value::Object(obj)
}

/// Renders an inline parameter. Path parameters are always required.
pub fn inline_parameter_value(param: &InlineParameter) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(param.name));
    obj.insert("in".to_string(), json!(param.location.as_str()));
    insert_text(&mut obj, "description", &param.description);
    let required = param.location == ParameterLocation::Path || param.required;
    obj.insert("required".to_string(), json!(required));
    obj.insert("schema".to_string(), value_schema_value(&param.schema));
    obj
}

/// Renders the schema of a response or request body, if any.
pub fn body_schema_value(schema: &BodySchema, ctx: &EmitContext<'_>) -> Option<Value> {
    match schema {
        BodySchema::None => None,
        BodySchema::Primitive { ty, format } => Some(ty.schema_value(format.as_deref())),
        BodySchema::Ref { ref_name } => selector_schema(&Selector::schema(ref_name.as_str()), ctx),
    }
}

fn reusable_parameter_value(param: &ReusableParameter) -> Value {
    let mut obj = inline_parameter_value(&param.parameter);
    if let Some(style) = param.style.as_deref().filter(|s| !s.is_empty()) {
        obj.insert("style".to_string(), json!(style));
    }
    if let Some(explode) = param.explode {
        obj.insert("explode".to_string(), json!(explode));
    }
    Value::Object(obj)
}

fn reusable_header_value(header: &ReusableHeader) -> Value {
    let mut obj = Map::new();
    insert_text(&mut obj, "description", &header.description);
    if let Some(style) = header.style.as_deref().filter(|s| !s.is_empty()) {
        obj.insert("style".to_string(), json!(style));
    }
    if let Some(explode) = header.explode {
        obj.insert("explode".to_string(), json!(explode));
    }
    obj.insert("schema".to_string(), value_schema_value(&header.schema));
    if let Some(example) = header.example.as_deref().filter(|e| !e.is_empty()) {
        obj.insert("example".to_string(), json!(example));
    }
    Value::Object(obj)
}

fn reusable_response_value(response: &ReusableResponse, ctx: &EmitContext<'_>) -> Value {
    let mut obj = Map::new();
    obj.insert("description".to_string(), json!(response.description));

    let mut headers = Map::new();
    for header in &response.headers {
        let name = header.name.trim();
        if name.is_empty() {
            continue;
        }
        let value = match &header.source {
            HeaderSource::Ref { ref_name } => {
                if !ctx.has_header(ref_name) {
                    debug!(header = %ref_name, "Dropping reference to missing header");
                    continue;
                }
                component_ref("headers", ref_name)
            }
            HeaderSource::Inline {
                description,
                schema,
            } => {
                let mut inline = Map::new();
                insert_text(&mut inline, "description", description);
                inline.insert("schema".to_string(), value_schema_value(schema));
                Value::Object(inline)
            }
        };
        headers.insert(name.to_string(), value);
    }
    if !headers.is_empty() {
        obj.insert("headers".to_string(), Value::Object(headers));
    }

    if let Some(schema) = body_schema_value(&response.schema, ctx) {
        let media_type = response.media_type.as_str();
        obj.insert(
            "content".to_string(),
            json!({ media_type: { "schema": schema } }),
        );
    }
    Value::Object(obj)
}

fn reusable_request_body_value(body: &ReusableRequestBody, ctx: &EmitContext<'_>) -> Value {
    let mut obj = Map::new();
    insert_text(&mut obj, "description", &body.description);
    obj.insert("required".to_string(), json!(body.required));

    let mut media = Map::new();
    if let Some(schema) = body_schema_value(&body.schema, ctx) {
        media.insert("schema".to_string(), schema);
    }
    if let Some(key) = body.example_ref.as_deref().filter(|k| !k.is_empty()) {
        if ctx.store.find::<ReusableExample>(key).is_some() {
            let mut examples = Map::new();
            examples.insert(key.to_string(), component_ref("examples", key));
            media.insert("examples".to_string(), Value::Object(examples));
        } else {
            debug!(example = %key, "Dropping reference to missing example");
        }
    }
    let mut content = Map::new();
    content.insert(body.media_type.clone(), Value::Object(media));
    obj.insert("content".to_string(), Value::Object(content));
    Value::Object(obj)
}

fn example_value(example: &ReusableExample, ctx: &EmitContext<'_>) -> Value {
    let mut obj = Map::new();
    insert_text(&mut obj, "summary", &example.summary);
    insert_text(&mut obj, "description", &example.description);
    match &example.value {
        ExampleValue::External { url } => {
            obj.insert("externalValue".to_string(), json!(url));
        }
        ExampleValue::Raw { json } => {
            let value = serde_json::from_str::<Value>(json).unwrap_or_else(|e| {
                warn!(example = %example.key, error = %e, "Example JSON is malformed, emitting raw text");
                Value::String(json.clone())
            });
            obj.insert("value".to_string(), value);
        }
        ExampleValue::Form(form) => {
            obj.insert("value".to_string(), form_example_value(form, ctx));
        }
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityStore, ExampleForm, ResponseHeader, SchemaNode, SecurityScheme};
    use crate::selector::PrimitiveType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_schema_validations() {
        let schema = ValueSchema {
            ty: PrimitiveType::Double,
            enum_values: vec!["".into()],
            minimum: Some(1.0),
            maximum: Some(9.5),
            ..ValueSchema::default()
        };
        assert_eq!(
            value_schema_value(&schema),
            json!({"type": "number", "format": "double", "minimum": 1, "maximum": 9.5})
        );
    }

    #[test]
    fn test_path_parameter_always_required() {
        let mut param = InlineParameter::new("id", ParameterLocation::Path);
        param.required = false;
        let obj = inline_parameter_value(&param);
        assert_eq!(obj["required"], json!(true));
    }

    #[test]
    fn test_response_headers_and_content() {
        let mut store = EntityStore::new();
        store.add(SchemaNode::object("Error", vec![])).unwrap();
        let mut response = ReusableResponse::new("NotFound", "Not found");
        response.schema = BodySchema::Ref {
            ref_name: "Error".into(),
        };
        response.headers = vec![
            ResponseHeader {
                name: "X-Rate".into(),
                source: HeaderSource::Ref {
                    ref_name: "Missing".into(),
                },
            },
            ResponseHeader {
                name: "X-Trace".into(),
                source: HeaderSource::Inline {
                    description: "trace id".into(),
                    schema: ValueSchema::default(),
                },
            },
        ];
        store.add(response).unwrap();

        let out = build_responses(&EmitContext::new(&store));
        assert_eq!(
            out["NotFound"],
            json!({
                "description": "Not found",
                "headers": {"X-Trace": {"description": "trace id", "schema": {"type": "string"}}},
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}
            })
        );
    }

    #[test]
    fn test_request_body_with_example_ref() {
        let mut store = EntityStore::new();
        store
            .add(ReusableExample::new(
                "Sample",
                ExampleValue::Raw {
                    json: "{\"a\": 1}".into(),
                },
            ))
            .unwrap();
        let mut body = ReusableRequestBody::new(
            "Upload",
            BodySchema::Primitive {
                ty: PrimitiveType::String,
                format: Some("binary".into()),
            },
        );
        body.media_type = "application/octet-stream".into();
        body.example_ref = Some("Sample".into());
        store.add(body).unwrap();

        let out = build_request_bodies(&EmitContext::new(&store));
        assert_eq!(
            out["Upload"],
            json!({
                "required": true,
                "content": {"application/octet-stream": {
                    "schema": {"type": "string", "format": "binary"},
                    "examples": {"Sample": {"$ref": "#/components/examples/Sample"}}
                }}
            })
        );
    }

    #[test]
    fn test_examples_precedence_and_malformed_raw() {
        let mut store = EntityStore::new();
        store
            .add(ReusableExample::new(
                "Remote",
                ExampleValue::External {
                    url: "https://example.com/a.json".into(),
                },
            ))
            .unwrap();
        store
            .add(ReusableExample::new(
                "Broken",
                ExampleValue::Raw {
                    json: "{not json".into(),
                },
            ))
            .unwrap();
        store
            .add(ReusableExample::new(
                "Empty",
                ExampleValue::Form(ExampleForm::default()),
            ))
            .unwrap();

        let out = build_examples(&EmitContext::new(&store));
        assert_eq!(
            out["Remote"],
            json!({"externalValue": "https://example.com/a.json"})
        );
        assert_eq!(out["Broken"], json!({"value": "{not json"}));
        assert_eq!(out["Empty"], json!({"value": {}}));
    }

    #[test]
    fn test_security_schemes_verbatim() {
        let mut store = EntityStore::new();
        store
            .add(SecurityScheme::api_key("key", "X-API-Key", "header"))
            .unwrap();
        let out = build_security_schemes(&EmitContext::new(&store));
        assert_eq!(
            out["key"],
            json!({"type": "apiKey", "name": "X-API-Key", "in": "header"})
        );
    }
}
