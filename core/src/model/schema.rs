#![deny(missing_docs)]

//! # Schema Nodes
//!
//! A reusable schema is a `SchemaNode`: a unique name plus a `NodeShape`.
//! Object fields reuse the same `NodeShape`, so arrays, inline objects and
//! compositions nest to any depth.

use super::{EntityId, Keyed};
use crate::selector::PrimitiveType;
use serde::{Deserialize, Serialize};

/// A named schema under `components.schemas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Stable identity.
    #[serde(default)]
    pub id: EntityId,
    /// Unique display name, also the component key.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The schema shape.
    pub shape: NodeShape,
}

impl SchemaNode {
    /// Creates a schema with a fresh id.
    pub fn new(name: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            description: None,
            shape,
        }
    }

    /// Creates an object schema from fields.
    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, NodeShape::Object { fields })
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Keyed for SchemaNode {
    fn id(&self) -> EntityId {
        self.id
    }
    fn key(&self) -> &str {
        &self.name
    }
    fn set_key(&mut self, key: String) {
        self.name = key;
    }
    fn reassign_id(&mut self) {
        self.id = EntityId::new();
    }
}

/// `oneOf` or `anyOf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Composition {
    /// `oneOf`
    #[serde(rename = "oneOf")]
    OneOf,
    /// `anyOf`
    #[serde(rename = "anyOf")]
    AnyOf,
}

impl Composition {
    /// The OpenAPI keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Composition::OneOf => "oneOf",
            Composition::AnyOf => "anyOf",
        }
    }
}

/// The closed set of schema shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeShape {
    /// `{type: object, properties, required}`. With no fields this is a bare `{type: object}`.
    Object {
        /// Ordered properties.
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// `{type: array, items}`.
    Array {
        /// Item shape.
        items: Box<NodeShape>,
    },
    /// `{type: string, enum}`.
    Enum {
        /// Ordered values; blank entries are filtered at emit time.
        #[serde(default)]
        values: Vec<String>,
    },
    /// `{type, format?}`.
    Primitive {
        /// Primitive type.
        #[serde(rename = "type")]
        ty: PrimitiveType,
        /// Free-form format (e.g. `date-time`, `int64`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// `{$ref: "#/components/schemas/<target>"}`.
    #[serde(rename = "$ref")]
    Ref {
        /// Name of another schema.
        target: String,
    },
    /// `{oneOf|anyOf: [...]}`.
    Composition {
        /// `oneOf` or `anyOf`.
        keyword: Composition,
        /// Alternatives.
        #[serde(default)]
        variants: Vec<Variant>,
    },
}

impl NodeShape {
    /// An unformatted primitive.
    pub fn primitive(ty: PrimitiveType) -> Self {
        NodeShape::Primitive { ty, format: None }
    }

    /// A primitive with a format.
    pub fn formatted(ty: PrimitiveType, format: impl Into<String>) -> Self {
        NodeShape::Primitive {
            ty,
            format: Some(format.into()),
        }
    }

    /// A reference to a named schema.
    pub fn reference(target: impl Into<String>) -> Self {
        NodeShape::Ref {
            target: target.into(),
        }
    }

    /// An array of the given item shape.
    pub fn array_of(items: NodeShape) -> Self {
        NodeShape::Array {
            items: Box::new(items),
        }
    }

    /// A string enum.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodeShape::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A `oneOf` composition.
    pub fn one_of(variants: Vec<Variant>) -> Self {
        NodeShape::Composition {
            keyword: Composition::OneOf,
            variants,
        }
    }

    /// An `anyOf` composition.
    pub fn any_of(variants: Vec<Variant>) -> Self {
        NodeShape::Composition {
            keyword: Composition::AnyOf,
            variants,
        }
    }

    /// The kind vocabulary: `object | array | enum | string | integer | number |
    /// double | boolean | $ref | oneOf | anyOf`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeShape::Object { .. } => "object",
            NodeShape::Array { .. } => "array",
            NodeShape::Enum { .. } => "enum",
            NodeShape::Primitive { ty, .. } => ty.as_str(),
            NodeShape::Ref { .. } => "$ref",
            NodeShape::Composition { keyword, .. } => keyword.keyword(),
        }
    }

    /// Visits every schema name this shape references, depth first.
    pub fn for_each_ref_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        match self {
            NodeShape::Ref { target } => f(target),
            NodeShape::Array { items } => items.for_each_ref_mut(f),
            NodeShape::Object { fields } => {
                for field in fields {
                    field.shape.for_each_ref_mut(f);
                }
            }
            NodeShape::Composition { variants, .. } => {
                for variant in variants {
                    if let Variant::Ref { target } = variant {
                        f(target);
                    }
                }
            }
            NodeShape::Enum { .. } | NodeShape::Primitive { .. } => {}
        }
    }

    /// Collects every schema name this shape references.
    pub fn referenced_names(&self) -> Vec<String> {
        let mut copy = self.clone();
        let mut names = Vec::new();
        copy.for_each_ref_mut(&mut |name| names.push(name.clone()));
        names
    }
}

/// A property of an object shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Property name.
    pub name: String,
    /// Whether the property is listed under `required`.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property shape.
    pub shape: NodeShape,
}

fn default_required() -> bool {
    true
}

impl Field {
    /// A required field.
    pub fn new(name: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: None,
            shape,
        }
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One alternative of a `oneOf`/`anyOf` composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Variant {
    /// A primitive type.
    Primitive {
        /// Primitive type.
        #[serde(rename = "type")]
        ty: PrimitiveType,
        /// Optional format.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// A reference to a named schema.
    #[serde(rename = "$ref")]
    Ref {
        /// Schema name.
        target: String,
    },
}

impl Variant {
    /// An unformatted primitive variant.
    pub fn primitive(ty: PrimitiveType) -> Self {
        Variant::Primitive { ty, format: None }
    }

    /// A schema reference variant.
    pub fn reference(target: impl Into<String>) -> Self {
        Variant::Ref {
            target: target.into(),
        }
    }
}
