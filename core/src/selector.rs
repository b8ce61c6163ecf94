#![deny(missing_docs)]

//! # Selectors
//!
//! A selector records "what does this body/field point to": nothing, a primitive
//! type, a named schema, or a reusable component.
//!
//! In memory it is the `Selector` sum type. The compact string grammar only
//! exists at the serialization boundary:
//!
//! ```text
//! "" | "type:" PRIMITIVE | "ref:" SCHEMA_NAME | "resp:" RESPONSE_KEY | "rb:" REQUEST_BODY_KEY
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// The primitive type vocabulary shared by schemas, fields, parameters and headers.
///
/// `Double` is not an OpenAPI type; it is always rendered as
/// `{type: number, format: double}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// `string`
    #[default]
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `number` + `format: double`
    Double,
    /// `boolean`
    Boolean,
}

impl PrimitiveType {
    /// All primitive types, in UI order.
    pub const ALL: [PrimitiveType; 5] = [
        PrimitiveType::String,
        PrimitiveType::Integer,
        PrimitiveType::Boolean,
        PrimitiveType::Number,
        PrimitiveType::Double,
    ];

    /// The selector/model spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Double => "double",
            PrimitiveType::Boolean => "boolean",
        }
    }

    /// Parses the model spelling (`double` included). Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveType::String),
            "integer" => Some(PrimitiveType::Integer),
            "number" => Some(PrimitiveType::Number),
            "double" => Some(PrimitiveType::Double),
            "boolean" => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }

    /// Detects the primitive type of an OpenAPI schema object from `type`/`format`.
    ///
    /// `{type: number, format: double}` is reported as `Double`.
    pub fn from_schema(node: &Value) -> Option<Self> {
        let ty = node.get("type").and_then(Value::as_str)?;
        if ty == "number" && node.get("format").and_then(Value::as_str) == Some("double") {
            return Some(PrimitiveType::Double);
        }
        match ty {
            "double" => None,
            other => Self::parse(other),
        }
    }

    /// The OpenAPI `type` keyword value.
    pub fn openapi_type(&self) -> &'static str {
        match self {
            PrimitiveType::Double => "number",
            other => other.as_str(),
        }
    }

    /// Renders `{type, format?}`.
    ///
    /// A `Double` always renders `format: double`, overriding any explicit format.
    pub fn schema_value(&self, format: Option<&str>) -> Value {
        let mut obj = Map::new();
        self.write_schema(&mut obj, format);
        Value::Object(obj)
    }

    /// Writes `type`/`format` into an existing schema object.
    pub fn write_schema(&self, obj: &mut Map<String, Value>, format: Option<&str>) {
        obj.insert("type".to_string(), json!(self.openapi_type()));
        match (self, format.filter(|f| !f.trim().is_empty())) {
            (PrimitiveType::Double, _) => {
                obj.insert("format".to_string(), json!("double"));
            }
            (_, Some(f)) => {
                obj.insert("format".to_string(), json!(f));
            }
            _ => {}
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reusable component sections a selector may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `components.responses`
    Response,
    /// `components.requestBodies`
    RequestBody,
}

impl ComponentKind {
    /// Selector prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ComponentKind::Response => "resp:",
            ComponentKind::RequestBody => "rb:",
        }
    }

    /// The `components.<section>` name.
    pub fn section(&self) -> &'static str {
        match self {
            ComponentKind::Response => "responses",
            ComponentKind::RequestBody => "requestBodies",
        }
    }
}

/// A decoded selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Selector {
    /// No schema.
    #[default]
    None,
    /// An inline primitive type.
    Primitive(PrimitiveType),
    /// A named schema under `components.schemas`.
    Schema(String),
    /// A reusable component by key.
    Component(ComponentKind, String),
}

impl Selector {
    /// Shorthand for `Selector::Schema`.
    pub fn schema(name: impl Into<String>) -> Self {
        Selector::Schema(name.into())
    }

    /// Shorthand for a `resp:` selector.
    pub fn response(key: impl Into<String>) -> Self {
        Selector::Component(ComponentKind::Response, key.into())
    }

    /// Shorthand for an `rb:` selector.
    pub fn request_body(key: impl Into<String>) -> Self {
        Selector::Component(ComponentKind::RequestBody, key.into())
    }

    /// Decodes the string grammar.
    ///
    /// Never fails: an unrecognized prefix, an unknown primitive or an empty
    /// name decodes to `Selector::None`.
    pub fn decode(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(t) = raw.strip_prefix("type:") {
            return PrimitiveType::parse(t)
                .map(Selector::Primitive)
                .unwrap_or_default();
        }
        let named = [
            ("ref:", None),
            ("resp:", Some(ComponentKind::Response)),
            ("rb:", Some(ComponentKind::RequestBody)),
        ];
        for (prefix, kind) in named {
            if let Some(name) = raw.strip_prefix(prefix) {
                if name.is_empty() {
                    return Selector::None;
                }
                return match kind {
                    None => Selector::Schema(name.to_string()),
                    Some(kind) => Selector::Component(kind, name.to_string()),
                };
            }
        }
        Selector::None
    }

    /// Encodes to the string grammar.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Whether this is the empty choice.
    pub fn is_none(&self) -> bool {
        matches!(self, Selector::None)
    }

    /// The schema name when this points at `components.schemas`.
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Selector::Schema(name) => Some(name),
            _ => None,
        }
    }

    /// Maps an OpenAPI schema node to a selector.
    ///
    /// `$ref` wins, then `number`+`double`, then any known primitive `type`.
    pub fn from_schema_node(node: &Value) -> Self {
        if let Some(name) = crate::document::schema_ref_name(node) {
            return Selector::Schema(name);
        }
        PrimitiveType::from_schema(node)
            .map(Selector::Primitive)
            .unwrap_or_default()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::None => Ok(()),
            Selector::Primitive(t) => write!(f, "type:{}", t),
            Selector::Schema(name) => write!(f, "ref:{}", name),
            Selector::Component(kind, key) => write!(f, "{}{}", kind.prefix(), key),
        }
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.encode()
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Selector::decode(&raw)
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Selector::decode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_prefixes() {
        assert_eq!(Selector::decode("ref:User"), Selector::schema("User"));
        assert_eq!(
            Selector::decode("type:double"),
            Selector::Primitive(PrimitiveType::Double)
        );
        assert_eq!(Selector::decode("resp:NotFound"), Selector::response("NotFound"));
        assert_eq!(Selector::decode("rb:CreateUser"), Selector::request_body("CreateUser"));
    }

    #[test]
    fn test_decode_unknown_is_none() {
        assert_eq!(Selector::decode(""), Selector::None);
        assert_eq!(Selector::decode("link:Foo"), Selector::None);
        assert_eq!(Selector::decode("type:object"), Selector::None);
        assert_eq!(Selector::decode("ref:"), Selector::None);
    }

    #[test]
    fn test_encode_decode_bijection() {
        let mut all = vec![
            Selector::None,
            Selector::schema("User"),
            Selector::response("Error"),
            Selector::request_body("Body"),
        ];
        all.extend(PrimitiveType::ALL.iter().map(|t| Selector::Primitive(*t)));
        for selector in all {
            assert_eq!(Selector::decode(&selector.encode()), selector);
        }
    }

    #[test]
    fn test_serde_uses_string_grammar() {
        let json = serde_json::to_string(&Selector::schema("Pet")).unwrap();
        assert_eq!(json, "\"ref:Pet\"");
        let back: Selector = serde_json::from_str("\"type:integer\"").unwrap();
        assert_eq!(back, Selector::Primitive(PrimitiveType::Integer));
    }

    #[test]
    fn test_double_schema_value() {
        assert_eq!(
            PrimitiveType::Double.schema_value(None),
            json!({"type": "number", "format": "double"})
        );
        assert_eq!(
            PrimitiveType::Double.schema_value(Some("float")),
            json!({"type": "number", "format": "double"})
        );
        assert_eq!(
            PrimitiveType::Integer.schema_value(Some("int64")),
            json!({"type": "integer", "format": "int64"})
        );
    }

    #[test]
    fn test_from_schema_node() {
        assert_eq!(
            Selector::from_schema_node(&json!({"$ref": "#/components/schemas/Cat"})),
            Selector::schema("Cat")
        );
        assert_eq!(
            Selector::from_schema_node(&json!({"type": "number", "format": "double"})),
            Selector::Primitive(PrimitiveType::Double)
        );
        assert_eq!(
            Selector::from_schema_node(&json!({"type": "object"})),
            Selector::None
        );
    }
}
