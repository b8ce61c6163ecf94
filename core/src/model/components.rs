#![deny(missing_docs)]

//! # Reusable Components
//!
//! Entities emitted under `components.parameters`, `components.responses`,
//! `components.headers`, `components.requestBodies`, `components.examples` and
//! `components.securitySchemes`. Each carries a `key` that is unique within its kind.

use super::operation::InlineParameter;
use super::{EntityId, Keyed};
use crate::error::{AppError, AppResult};
use crate::selector::PrimitiveType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Default media type for bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Form media type, the importer's fallback body.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

fn default_media_type() -> String {
    JSON_MEDIA_TYPE.to_string()
}

fn default_true() -> bool {
    true
}

/// Primitive type + format + enum + validations, shared by parameters and headers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueSchema {
    /// Primitive type.
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
    /// Optional format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Allowed values; blanks are filtered at emit time.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// `minLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// `maxLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// `pattern`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// `minimum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// `maximum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ValueSchema {
    /// A schema of the given type with no validations.
    pub fn of(ty: PrimitiveType) -> Self {
        Self {
            ty,
            ..Self::default()
        }
    }
}

/// How a response or request body declares its schema (`schemaMode`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "schemaMode", rename_all = "camelCase")]
pub enum BodySchema {
    /// No schema.
    #[default]
    None,
    /// Inline primitive.
    Primitive {
        /// Primitive type.
        #[serde(rename = "primitiveType")]
        ty: PrimitiveType,
        /// Optional format.
        #[serde(
            rename = "primitiveFormat",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        format: Option<String>,
    },
    /// Reference to a named schema.
    Ref {
        /// Schema name.
        #[serde(rename = "refName")]
        ref_name: String,
    },
}

/// A reusable parameter (`components.parameters.<key>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableParameter {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// The parameter definition.
    #[serde(flatten)]
    pub parameter: InlineParameter,
    /// Serialization `style`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Serialization `explode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
}

impl ReusableParameter {
    /// Wraps a parameter definition under a key.
    pub fn new(key: impl Into<String>, parameter: InlineParameter) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            parameter,
            style: None,
            explode: None,
        }
    }
}

/// A reusable header (`components.headers.<key>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableHeader {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Serialization `style`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Serialization `explode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Value schema.
    #[serde(default)]
    pub schema: ValueSchema,
    /// Sample value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ReusableHeader {
    /// A string header with no description.
    pub fn new(key: impl Into<String>, schema: ValueSchema) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            description: String::new(),
            style: None,
            explode: None,
            schema,
            example: None,
        }
    }
}

/// A header entry inside a reusable response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    /// HTTP header field name.
    pub name: String,
    /// Reference or inline definition.
    #[serde(flatten)]
    pub source: HeaderSource,
}

/// Where a response header's definition lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum HeaderSource {
    /// `{$ref: "#/components/headers/<ref_name>"}`.
    Ref {
        /// Key under `components.headers`.
        #[serde(rename = "refName")]
        ref_name: String,
    },
    /// Declared in place.
    Inline {
        /// Description.
        #[serde(default)]
        description: String,
        /// Value schema.
        #[serde(default)]
        schema: ValueSchema,
    },
}

/// A reusable response (`components.responses.<key>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableResponse {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Media type of the body.
    #[serde(default = "default_media_type")]
    pub media_type: String,
    /// Body schema.
    #[serde(flatten)]
    pub schema: BodySchema,
    /// Response headers.
    #[serde(default)]
    pub headers: Vec<ResponseHeader>,
}

impl ReusableResponse {
    /// A JSON response with no body schema.
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            description: description.into(),
            media_type: default_media_type(),
            schema: BodySchema::None,
            headers: Vec::new(),
        }
    }
}

/// A reusable request body (`components.requestBodies.<key>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableRequestBody {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Media type of the body.
    #[serde(default = "default_media_type")]
    pub media_type: String,
    /// `required`
    #[serde(default = "default_true")]
    pub required: bool,
    /// Body schema.
    #[serde(flatten)]
    pub schema: BodySchema,
    /// Key of a reusable example attached under the media type's `examples`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_ref: Option<String>,
}

impl ReusableRequestBody {
    /// A required JSON body with the given schema.
    pub fn new(key: impl Into<String>, schema: BodySchema) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            description: String::new(),
            media_type: default_media_type(),
            required: true,
            schema,
            example_ref: None,
        }
    }
}

/// Field values entered through an example form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExampleForm {
    /// Schema the form is shaped after; supplies types and unset values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Entered values by property name, as typed.
    pub values: IndexMap<String, String>,
}

/// The payload of an example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ExampleValue {
    /// Built from form values.
    Form(ExampleForm),
    /// A literal JSON payload.
    Raw {
        /// JSON text; emitted as a string if it does not parse.
        json: String,
    },
    /// `externalValue`.
    External {
        /// URL of the external payload.
        url: String,
    },
}

impl Default for ExampleValue {
    fn default() -> Self {
        ExampleValue::Form(ExampleForm::default())
    }
}

/// A reusable example (`components.examples.<key>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableExample {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// `summary`
    #[serde(default)]
    pub summary: String,
    /// `description`
    #[serde(default)]
    pub description: String,
    /// Payload.
    #[serde(default)]
    pub value: ExampleValue,
}

impl ReusableExample {
    /// An example with the given payload.
    pub fn new(key: impl Into<String>, value: ExampleValue) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            summary: String::new(),
            description: String::new(),
            value,
        }
    }
}

/// A security scheme (`components.securitySchemes.<key>`).
///
/// The definition object is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Component key.
    pub key: String,
    /// Raw Security Scheme Object.
    pub definition: Map<String, Value>,
}

impl SecurityScheme {
    /// Wraps a raw definition.
    pub fn new(key: impl Into<String>, definition: Map<String, Value>) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into(),
            definition,
        }
    }

    /// `{type: http, scheme: bearer, bearerFormat?}`.
    pub fn http_bearer(key: impl Into<String>, bearer_format: Option<&str>) -> Self {
        let mut def = Map::new();
        def.insert("type".to_string(), json!("http"));
        def.insert("scheme".to_string(), json!("bearer"));
        if let Some(fmt) = bearer_format.filter(|f| !f.is_empty()) {
            def.insert("bearerFormat".to_string(), json!(fmt));
        }
        Self::new(key, def)
    }

    /// `{type: apiKey, name, in}`.
    pub fn api_key(key: impl Into<String>, name: &str, location: &str) -> Self {
        let mut def = Map::new();
        def.insert("type".to_string(), json!("apiKey"));
        def.insert("name".to_string(), json!(name));
        def.insert("in".to_string(), json!(location));
        Self::new(key, def)
    }

    /// `{type: oauth2, flows}` from the flows object as JSON text.
    pub fn oauth2(key: impl Into<String>, flows_json: &str) -> AppResult<Self> {
        let flows: Value = serde_json::from_str(flows_json)
            .map_err(|e| AppError::Validation(format!("Invalid OAuth2 flows JSON: {}", e)))?;
        if !flows.is_object() {
            return Err(AppError::Validation(
                "OAuth2 flows must be a JSON object".to_string(),
            ));
        }
        let mut def = Map::new();
        def.insert("type".to_string(), json!("oauth2"));
        def.insert("flows".to_string(), flows);
        Ok(Self::new(key, def))
    }

    /// `{type: openIdConnect, openIdConnectUrl}`.
    pub fn open_id_connect(key: impl Into<String>, url: &str) -> Self {
        let mut def = Map::new();
        def.insert("type".to_string(), json!("openIdConnect"));
        def.insert("openIdConnectUrl".to_string(), json!(url));
        Self::new(key, def)
    }
}

macro_rules! impl_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn id(&self) -> EntityId {
                    self.id
                }
                fn key(&self) -> &str {
                    &self.key
                }
                fn set_key(&mut self, key: String) {
                    self.key = key;
                }
                fn reassign_id(&mut self) {
                    self.id = EntityId::new();
                }
            }
        )*
    };
}

impl_keyed!(
    ReusableParameter,
    ReusableHeader,
    ReusableResponse,
    ReusableRequestBody,
    ReusableExample,
    SecurityScheme,
);
