#![deny(missing_docs)]

//! # Entity Model
//!
//! The normalized, identity-bearing representation of everything a user
//! authors: schemas, operations and reusable components.
//!
//! - **schema**: `SchemaNode`, `Field`, `NodeShape`, `Variant`.
//! - **operation**: operations ("blocks"), their parameters and responses.
//! - **components**: reusable parameters, responses, headers, request bodies,
//!   examples and security schemes.
//! - **store**: the `EntityStore` holding all collections.
//! - **drafts**: in-progress schema edits.

pub mod components;
pub mod drafts;
pub mod operation;
pub mod schema;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use components::{
    BodySchema, ExampleForm, ExampleValue, HeaderSource, ReusableExample, ReusableHeader,
    ReusableParameter, ReusableRequestBody, ReusableResponse, ResponseHeader, SecurityScheme,
    ValueSchema,
};
pub use drafts::SchemaDraft;
pub use operation::{
    synthesize_operation_id, HttpMethod, InlineParameter, Operation, OperationParameter,
    ParameterLocation, ResponseEntry,
};
pub use schema::{Composition, Field, NodeShape, SchemaNode, Variant};
pub use store::{unique_copy_key, EntityStore, StoredEntity};

/// Stable identity of an entity, independent of its display name or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity addressable by id and by a unique key within its collection.
pub trait Keyed {
    /// Stable identity.
    fn id(&self) -> EntityId;
    /// Unique name/key within the collection.
    fn key(&self) -> &str;
    /// Replaces the name/key.
    fn set_key(&mut self, key: String);
    /// Assigns a fresh identity (used when duplicating).
    fn reassign_id(&mut self);
}

/// Splits a comma-separated tag list, trimming entries and dropping blanks.
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
