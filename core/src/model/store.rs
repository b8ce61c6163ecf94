#![deny(missing_docs)]

//! # Entity Store
//!
//! All user-authored collections in one value. The store validates names and
//! keys on the way in but never cascades deletes: removing a schema leaves
//! selectors pointing at it, and the emitter degrades around them.

use super::components::{
    ReusableExample, ReusableHeader, ReusableParameter, ReusableRequestBody, ReusableResponse,
    SecurityScheme,
};
use super::drafts::SchemaDraft;
use super::operation::Operation;
use super::schema::SchemaNode;
use super::{parse_tags, EntityId, Keyed};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// The normalized collection of every entity the document is derived from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityStore {
    /// Named schemas (`components.schemas`).
    pub schemas: Vec<SchemaNode>,
    /// Operations ("blocks"), in canvas order.
    pub operations: Vec<Operation>,
    /// `components.parameters`
    pub parameters: Vec<ReusableParameter>,
    /// `components.responses`
    pub responses: Vec<ReusableResponse>,
    /// `components.headers`
    pub headers: Vec<ReusableHeader>,
    /// `components.requestBodies`
    pub request_bodies: Vec<ReusableRequestBody>,
    /// `components.examples`
    pub examples: Vec<ReusableExample>,
    /// `components.securitySchemes`
    pub security_schemes: Vec<SecurityScheme>,
    /// Comma-separated tags for operations that declare none.
    pub default_tags_text: String,
    /// Unsaved schema edits.
    pub drafts: Vec<SchemaDraft>,
}

/// A keyed collection living inside the `EntityStore`.
///
/// Gives schemas and every reusable component kind the same
/// add/replace/remove/duplicate/lookup surface.
pub trait StoredEntity: Keyed + Clone + Sized {
    /// Human-readable kind, used in validation messages.
    const KIND: &'static str;

    /// The collection in the store.
    fn collection(store: &EntityStore) -> &Vec<Self>;

    /// The collection in the store, mutably.
    fn collection_mut(store: &mut EntityStore) -> &mut Vec<Self>;
}

macro_rules! stored_entity {
    ($ty:ty, $kind:literal, $field:ident) => {
        impl StoredEntity for $ty {
            const KIND: &'static str = $kind;

            fn collection(store: &EntityStore) -> &Vec<Self> {
                &store.$field
            }

            fn collection_mut(store: &mut EntityStore) -> &mut Vec<Self> {
                &mut store.$field
            }
        }
    };
}

stored_entity!(SchemaNode, "Schema", schemas);
stored_entity!(ReusableParameter, "Parameter", parameters);
stored_entity!(ReusableResponse, "Response", responses);
stored_entity!(ReusableHeader, "Header", headers);
stored_entity!(ReusableRequestBody, "Request body", request_bodies);
stored_entity!(ReusableExample, "Example", examples);
stored_entity!(SecurityScheme, "Security scheme", security_schemes);

impl EntityStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.operations.is_empty()
            && self.parameters.is_empty()
            && self.responses.is_empty()
            && self.headers.is_empty()
            && self.request_bodies.is_empty()
            && self.examples.is_empty()
            && self.security_schemes.is_empty()
    }

    /// Document-wide default tags, trimmed with blanks dropped.
    pub fn default_tags(&self) -> Vec<String> {
        parse_tags(&self.default_tags_text)
    }

    /// Adds an entity. Its key must be non-empty and unique within its kind.
    pub fn add<T: StoredEntity>(&mut self, mut item: T) -> AppResult<EntityId> {
        let key = validated_key::<T>(item.key())?;
        if self.find::<T>(&key).is_some() {
            return Err(AppError::Validation(format!(
                "{} '{}' already exists",
                T::KIND,
                key
            )));
        }
        item.set_key(key);
        let id = item.id();
        T::collection_mut(self).push(item);
        Ok(id)
    }

    /// Replaces the entity with the same id, keeping its position.
    ///
    /// The new key must not collide with another entity of the same kind.
    pub fn replace<T: StoredEntity>(&mut self, mut item: T) -> AppResult<()> {
        let key = validated_key::<T>(item.key())?;
        let id = item.id();
        if T::collection(self)
            .iter()
            .any(|other| other.key() == key && other.id() != id)
        {
            return Err(AppError::Validation(format!(
                "{} '{}' already exists",
                T::KIND,
                key
            )));
        }
        let slot = T::collection_mut(self)
            .iter_mut()
            .find(|other| other.id() == id)
            .ok_or_else(|| unknown_id(T::KIND, id))?;
        item.set_key(key);
        *slot = item;
        Ok(())
    }

    /// Removes an entity by id. References to it are left in place.
    pub fn remove<T: StoredEntity>(&mut self, id: EntityId) -> AppResult<T> {
        let items = T::collection_mut(self);
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| unknown_id(T::KIND, id))?;
        Ok(items.remove(index))
    }

    /// Copies an entity under a fresh id and a `<key>_copy` key, appended at the end.
    pub fn duplicate<T: StoredEntity>(&mut self, id: EntityId) -> AppResult<EntityId> {
        let source = self.get::<T>(id).ok_or_else(|| unknown_id(T::KIND, id))?;
        let mut copy = source.clone();
        let key = unique_copy_key(source.key(), |candidate| {
            self.find::<T>(candidate).is_some()
        });
        copy.set_key(key);
        copy.reassign_id();
        let copy_id = copy.id();
        T::collection_mut(self).push(copy);
        Ok(copy_id)
    }

    /// Looks an entity up by id.
    pub fn get<T: StoredEntity>(&self, id: EntityId) -> Option<&T> {
        T::collection(self).iter().find(|item| item.id() == id)
    }

    /// Looks an entity up by key.
    pub fn find<T: StoredEntity>(&self, key: &str) -> Option<&T> {
        T::collection(self).iter().find(|item| item.key() == key)
    }

    /// Whether a schema with this name exists.
    pub fn has_schema(&self, name: &str) -> bool {
        self.find::<SchemaNode>(name).is_some()
    }

    /// Looks a schema up by name.
    pub fn schema_by_name(&self, name: &str) -> Option<&SchemaNode> {
        self.find::<SchemaNode>(name)
    }

    /// Appends an operation.
    pub fn add_operation(&mut self, operation: Operation) -> EntityId {
        let id = operation.id;
        self.operations.push(operation);
        id
    }

    /// Replaces the operation with the same id.
    pub fn update_operation(&mut self, operation: Operation) -> AppResult<()> {
        let slot = self
            .operations
            .iter_mut()
            .find(|op| op.id == operation.id)
            .ok_or_else(|| unknown_id("Operation", operation.id))?;
        *slot = operation;
        Ok(())
    }

    /// Removes an operation by id.
    pub fn remove_operation(&mut self, id: EntityId) -> AppResult<Operation> {
        let index = self
            .operations
            .iter()
            .position(|op| op.id == id)
            .ok_or_else(|| unknown_id("Operation", id))?;
        Ok(self.operations.remove(index))
    }

    /// Copies an operation and inserts the copy right after the source.
    pub fn duplicate_operation(&mut self, id: EntityId) -> AppResult<EntityId> {
        let index = self
            .operations
            .iter()
            .position(|op| op.id == id)
            .ok_or_else(|| unknown_id("Operation", id))?;
        let mut copy = self.operations[index].clone();
        let operation_id = unique_copy_key(&copy.operation_id, |candidate| {
            self.operations.iter().any(|op| op.operation_id == candidate)
        });
        copy.set_key(operation_id);
        copy.reassign_id();
        let copy_id = copy.id;
        self.operations.insert(index + 1, copy);
        Ok(copy_id)
    }

    /// Looks an operation up by id.
    pub fn operation(&self, id: EntityId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }
}

/// Picks `<base>_copy`, then `<base>_copy2`, `<base>_copy3`, ... until `taken` says no.
pub fn unique_copy_key(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let first = format!("{}_copy", base);
    if !taken(&first) {
        return first;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_copy{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn validated_key<T: StoredEntity>(key: &str) -> AppResult<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "{} name must not be empty",
            T::KIND
        )));
    }
    Ok(trimmed.to_string())
}

fn unknown_id(kind: &str, id: EntityId) -> AppError {
    AppError::Validation(format!("{} with id {} not found", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::components::{BodySchema, ReusableRequestBody};
    use crate::model::operation::HttpMethod;
    use crate::model::schema::{Field, NodeShape};
    use crate::selector::PrimitiveType;

    fn user() -> SchemaNode {
        SchemaNode::object(
            "User",
            vec![Field::new("id", NodeShape::primitive(PrimitiveType::Integer))],
        )
    }

    #[test]
    fn test_add_rejects_empty_and_duplicate_names() {
        let mut store = EntityStore::new();
        store.add(user()).unwrap();
        assert!(matches!(
            store.add(user()),
            Err(AppError::Validation(msg)) if msg.contains("already exists")
        ));
        assert!(store.add(SchemaNode::object("  ", vec![])).is_err());
    }

    #[test]
    fn test_add_trims_key() {
        let mut store = EntityStore::new();
        store.add(SchemaNode::object(" Pet ", vec![])).unwrap();
        assert!(store.has_schema("Pet"));
    }

    #[test]
    fn test_replace_keeps_position_and_checks_collisions() {
        let mut store = EntityStore::new();
        let user_id = store.add(user()).unwrap();
        store.add(SchemaNode::object("Pet", vec![])).unwrap();

        let mut renamed = store.get::<SchemaNode>(user_id).unwrap().clone();
        renamed.name = "Pet".into();
        assert!(store.replace(renamed.clone()).is_err());

        renamed.name = "Account".into();
        store.replace(renamed).unwrap();
        assert_eq!(store.schemas[0].name, "Account");
    }

    #[test]
    fn test_duplicate_uniquifies_key() {
        let mut store = EntityStore::new();
        let id = store.add(user()).unwrap();
        store.duplicate::<SchemaNode>(id).unwrap();
        store.duplicate::<SchemaNode>(id).unwrap();
        let names: Vec<_> = store.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["User", "User_copy", "User_copy2"]);
        assert_ne!(store.schemas[0].id, store.schemas[1].id);
    }

    #[test]
    fn test_remove_does_not_cascade() {
        let mut store = EntityStore::new();
        let id = store.add(user()).unwrap();
        store
            .add(ReusableRequestBody::new(
                "CreateUser",
                BodySchema::Ref {
                    ref_name: "User".into(),
                },
            ))
            .unwrap();
        store.remove::<SchemaNode>(id).unwrap();
        assert!(store.schemas.is_empty());
        assert_eq!(store.request_bodies.len(), 1);
        assert!(store.remove::<SchemaNode>(id).is_err());
    }

    #[test]
    fn test_duplicate_operation_inserts_after_source() {
        let mut store = EntityStore::new();
        let first = store.add_operation(Operation::new(HttpMethod::Get, "/users"));
        store.add_operation(Operation::new(HttpMethod::Post, "/users"));
        let copy = store.duplicate_operation(first).unwrap();
        assert_eq!(store.operations[1].id, copy);
        assert_eq!(store.operations[1].operation_id, "get_users_copy");
        assert_eq!(store.operations[2].method, HttpMethod::Post);
    }

    #[test]
    fn test_default_tags() {
        let store = EntityStore {
            default_tags_text: "core, ,v1".into(),
            ..EntityStore::default()
        };
        assert_eq!(store.default_tags(), vec!["core", "v1"]);
    }
}
