//! Decoding of reusable components, plus the parameter and body helpers the
//! path importer shares.

use super::schemas::primitive_from_node;
use super::{section_entries, str_prop};
use crate::document::{extract_component_name, schema_ref_name};
use crate::model::components::{FORM_MEDIA_TYPE, JSON_MEDIA_TYPE};
use crate::model::{
    BodySchema, ExampleValue, HeaderSource, InlineParameter, ParameterLocation, ReusableExample,
    ReusableHeader, ReusableParameter, ReusableRequestBody, ReusableResponse, ResponseHeader,
    SecurityScheme, ValueSchema,
};
use crate::selector::PrimitiveType;
use serde_json::Value;
use tracing::debug;

/// `components.parameters`
pub fn import_parameters(section: Option<&Value>) -> Vec<ReusableParameter> {
    section_entries(section)
        .filter(|(_, node)| node.is_object())
        .map(|(key, node)| {
            let mut param = ReusableParameter::new(key.clone(), inline_parameter_from_node(node));
            param.style = node
                .get("style")
                .and_then(Value::as_str)
                .map(str::to_string);
            param.explode = node.get("explode").and_then(Value::as_bool);
            param
        })
        .collect()
}

/// `components.headers`
pub fn import_headers(section: Option<&Value>) -> Vec<ReusableHeader> {
    section_entries(section)
        .filter(|(_, node)| node.is_object())
        .map(|(key, node)| {
            let mut header = ReusableHeader::new(key.clone(), value_schema_from_node(node.get("schema")));
            header.description = str_prop(node, "description").to_string();
            header.style = node
                .get("style")
                .and_then(Value::as_str)
                .map(str::to_string);
            header.explode = node.get("explode").and_then(Value::as_bool);
            header.example = node.get("example").map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            header
        })
        .collect()
}

/// `components.responses`, each with its own header map.
pub fn import_responses(section: Option<&Value>) -> Vec<ReusableResponse> {
    section_entries(section)
        .filter(|(_, node)| node.is_object())
        .map(|(key, node)| {
            let mut response = ReusableResponse::new(key.clone(), str_prop(node, "description"));
            if let Some((media_type, media)) = first_media(node) {
                response.media_type = media_type.to_string();
                response.schema = body_schema_from_node(media.get("schema"));
            }
            response.headers = section_entries(node.get("headers"))
                .map(|(name, header)| ResponseHeader {
                    name: name.clone(),
                    source: header_source_from_node(header),
                })
                .collect();
            response
        })
        .collect()
}

/// `components.requestBodies`
pub fn import_request_bodies(section: Option<&Value>) -> Vec<ReusableRequestBody> {
    section_entries(section)
        .filter(|(_, node)| node.is_object())
        .map(|(key, node)| {
            let mut body = ReusableRequestBody::new(key.clone(), BodySchema::None);
            body.description = str_prop(node, "description").to_string();
            body.required = node
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if let Some((media_type, media)) = first_media(node) {
                body.media_type = media_type.to_string();
                body.schema = body_schema_from_node(media.get("schema"));
                body.example_ref = section_entries(media.get("examples")).find_map(|(_, ex)| {
                    ex.get("$ref")
                        .and_then(Value::as_str)
                        .and_then(|r| extract_component_name(r, "examples"))
                });
            }
            body
        })
        .collect()
}

/// `components.examples`: `externalValue` wins over `value`; neither is an empty form.
pub fn import_examples(section: Option<&Value>) -> Vec<ReusableExample> {
    section_entries(section)
        .filter(|(_, node)| node.is_object())
        .map(|(key, node)| {
            let value = if let Some(url) = node.get("externalValue").and_then(Value::as_str) {
                ExampleValue::External {
                    url: url.to_string(),
                }
            } else if let Some(literal) = node.get("value") {
                let json = serde_json::to_string_pretty(literal)
                    .unwrap_or_else(|_| literal.to_string());
                ExampleValue::Raw { json }
            } else {
                ExampleValue::default()
            };
            let mut example = ReusableExample::new(key.clone(), value);
            example.summary = str_prop(node, "summary").to_string();
            example.description = str_prop(node, "description").to_string();
            example
        })
        .collect()
}

/// `components.securitySchemes`, each definition kept verbatim.
pub fn import_security_schemes(section: Option<&Value>) -> Vec<SecurityScheme> {
    section_entries(section)
        .filter_map(|(key, node)| {
            let definition = node.as_object()?;
            Some(SecurityScheme::new(key.clone(), definition.clone()))
        })
        .collect()
}

/// Flattens a Parameter Object into inline attributes.
pub fn inline_parameter_from_node(node: &Value) -> InlineParameter {
    let location = ParameterLocation::parse(str_prop(node, "in")).unwrap_or_default();
    InlineParameter {
        name: str_prop(node, "name").to_string(),
        location,
        required: node
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(location == ParameterLocation::Path),
        description: str_prop(node, "description").to_string(),
        schema: value_schema_from_node(node.get("schema")),
    }
}

/// Reads primitive type, format, enum and validations from a schema node.
pub fn value_schema_from_node(node: Option<&Value>) -> ValueSchema {
    let Some(node) = node else {
        return ValueSchema::default();
    };
    let (ty, format) = primitive_from_node(node);
    ValueSchema {
        ty,
        format,
        enum_values: node
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        min_length: node.get("minLength").and_then(Value::as_u64),
        max_length: node.get("maxLength").and_then(Value::as_u64),
        pattern: node
            .get("pattern")
            .and_then(Value::as_str)
            .map(str::to_string),
        minimum: node.get("minimum").and_then(Value::as_f64),
        maximum: node.get("maximum").and_then(Value::as_f64),
    }
}

/// The schema of an operation body: `application/json` first, then form encoding.
pub fn operation_body_schema(node: &Value) -> Option<&Value> {
    let content = node.get("content")?;
    [JSON_MEDIA_TYPE, FORM_MEDIA_TYPE]
        .iter()
        .find_map(|media_type| content.get(*media_type)?.get("schema"))
}

fn first_media(node: &Value) -> Option<(&str, &Value)> {
    node.get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.iter().next())
        .map(|(media_type, media)| (media_type.as_str(), media))
}

fn body_schema_from_node(node: Option<&Value>) -> BodySchema {
    let Some(node) = node else {
        return BodySchema::None;
    };
    if let Some(ref_name) = schema_ref_name(node) {
        return BodySchema::Ref { ref_name };
    }
    match PrimitiveType::from_schema(node) {
        Some(_) => {
            let (ty, format) = primitive_from_node(node);
            BodySchema::Primitive { ty, format }
        }
        None => {
            debug!("Body schema is neither a reference nor a primitive, importing as none");
            BodySchema::None
        }
    }
}

fn header_source_from_node(node: &Value) -> HeaderSource {
    if let Some(ref_name) = node
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| extract_component_name(r, "headers"))
    {
        return HeaderSource::Ref { ref_name };
    }
    HeaderSource::Inline {
        description: str_prop(node, "description").to_string(),
        schema: value_schema_from_node(node.get("schema")),
    }
}
