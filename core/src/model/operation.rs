#![deny(missing_docs)]

//! # Operations
//!
//! An operation ("block") is one method on one path, with its parameters,
//! request selector and responses.

use super::components::ValueSchema;
use super::{parse_tags, EntityId, Keyed};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods the canvas models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Every supported method.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Lowercase path-item key.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| format!("Unsupported HTTP method: {}", s))
    }
}

/// Where a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// `?name=`
    #[default]
    Query,
    /// `{name}` in the path template.
    Path,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParameterLocation {
    /// The OpenAPI `in` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }

    /// Parses an `in` value. Unknown locations yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "query" => Some(ParameterLocation::Query),
            "path" => Some(ParameterLocation::Path),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// A parameter declared inline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineParameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    /// Whether the parameter is required (always emitted `true` for path parameters).
    #[serde(default)]
    pub required: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Value schema with validations.
    #[serde(default)]
    pub schema: ValueSchema,
}

impl InlineParameter {
    /// A string parameter at the given location.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParameterLocation::Path,
            description: String::new(),
            schema: ValueSchema::default(),
        }
    }
}

/// An operation parameter: inline, or a reference to a reusable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum OperationParameter {
    /// Declared in place.
    Inline(InlineParameter),
    /// `{$ref: "#/components/parameters/<ref_name>"}`.
    Ref {
        /// Key under `components.parameters`.
        #[serde(rename = "refName")]
        ref_name: String,
    },
}

/// One explicit response of an operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    /// Status code key; blank means `default`.
    #[serde(default)]
    pub status: String,
    /// Response description.
    #[serde(default)]
    pub description: String,
    /// Body schema (or `resp:` reusable response).
    #[serde(default, rename = "schemaRef")]
    pub body: Selector,
}

impl ResponseEntry {
    /// Creates a response entry.
    pub fn new(status: impl Into<String>, description: impl Into<String>, body: Selector) -> Self {
        Self {
            status: status.into(),
            description: description.into(),
            body,
        }
    }

    /// The emitted status key.
    pub fn status_key(&self) -> &str {
        let trimmed = self.status.trim();
        if trimmed.is_empty() {
            "default"
        } else {
            trimmed
        }
    }
}

/// An operation ("block").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template, e.g. `/users/{id}`.
    pub path: String,
    /// `operationId`.
    #[serde(default)]
    pub operation_id: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Comma-separated operation tags.
    #[serde(default)]
    pub tags_text: String,
    /// Request body selector (`rb:` selects a reusable request body).
    #[serde(default, rename = "requestSchemaRef")]
    pub request: Selector,
    /// Default `200` response selector, used when `responses` is empty.
    #[serde(default, rename = "responseSchemaRef")]
    pub default_response: Selector,
    /// Parameters, in order.
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    /// Explicit responses, in order.
    #[serde(default)]
    pub responses: Vec<ResponseEntry>,
}

impl Operation {
    /// A bare operation with a synthesized `operationId`.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: EntityId::new(),
            operation_id: synthesize_operation_id(method, &path),
            method,
            path,
            description: String::new(),
            tags_text: String::new(),
            request: Selector::None,
            default_response: Selector::None,
            parameters: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Operation tags parsed from `tags_text`.
    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_text)
    }

    /// The synthesized summary, `"{METHOD} {path}"`.
    pub fn summary(&self) -> String {
        format!("{} {}", self.method, self.path.trim())
    }

    /// Every selector slot on this operation, mutably.
    pub fn selectors_mut(&mut self) -> impl Iterator<Item = &mut Selector> {
        std::iter::once(&mut self.request)
            .chain(std::iter::once(&mut self.default_response))
            .chain(self.responses.iter_mut().map(|r| &mut r.body))
    }
}

impl Keyed for Operation {
    fn id(&self) -> EntityId {
        self.id
    }
    fn key(&self) -> &str {
        &self.operation_id
    }
    fn set_key(&mut self, key: String) {
        self.operation_id = key;
    }
    fn reassign_id(&mut self) {
        self.id = EntityId::new();
    }
}

/// Derives an `operationId` from method and path: `GET /users/{id}` -> `get_users_id`.
pub fn synthesize_operation_id(method: HttpMethod, path: &str) -> String {
    let mut out = method.as_str().to_string();
    for segment in path.split('/') {
        let cleaned: String = segment
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let cleaned = cleaned.trim_matches('_');
        if !cleaned.is_empty() {
            out.push('_');
            out.push_str(cleaned);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("options".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
        assert!("trace".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_summary_and_operation_id() {
        let op = Operation::new(HttpMethod::Get, "/users/{id}");
        assert_eq!(op.summary(), "GET /users/{id}");
        assert_eq!(op.operation_id, "get_users_id");
        assert_eq!(synthesize_operation_id(HttpMethod::Post, "/"), "post");
    }

    #[test]
    fn test_summary_uses_trimmed_path() {
        let mut op = Operation::new(HttpMethod::Put, "/users");
        op.path = "  /users/{id} ".into();
        assert_eq!(op.summary(), "PUT /users/{id}");
    }

    #[test]
    fn test_blank_status_is_default() {
        assert_eq!(ResponseEntry::new("  ", "", Selector::None).status_key(), "default");
        assert_eq!(ResponseEntry::new("404", "", Selector::None).status_key(), "404");
    }

    #[test]
    fn test_selectors_mut_covers_all_slots() {
        let mut op = Operation::new(HttpMethod::Post, "/pets");
        op.request = Selector::schema("Pet");
        op.default_response = Selector::schema("Pet");
        op.responses
            .push(ResponseEntry::new("400", "bad", Selector::schema("Pet")));
        assert_eq!(op.selectors_mut().count(), 3);
    }
}
