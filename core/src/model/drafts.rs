#![deny(missing_docs)]

//! # Schema Drafts
//!
//! In-progress schema edits. A draft holds a deep copy of the schema being
//! edited (or a blank one), so nothing reaches the store until it is submitted.
//! Drafts live in the store so rename propagation can keep them current.

use super::schema::{NodeShape, SchemaNode};
use super::store::EntityStore;
use super::EntityId;
use crate::error::{AppError, AppResult};
use crate::rename::propagate_rename;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An unsaved schema edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDraft {
    /// Identity of the draft itself.
    #[serde(default)]
    pub id: EntityId,
    /// The schema being edited; `None` for a new schema.
    #[serde(default)]
    pub editing: Option<EntityId>,
    /// Working copy.
    pub node: SchemaNode,
}

impl EntityStore {
    /// Opens a draft for a new, empty object schema.
    pub fn start_new_draft(&mut self) -> EntityId {
        let draft = SchemaDraft {
            id: EntityId::new(),
            editing: None,
            node: SchemaNode::object("", Vec::new()),
        };
        let id = draft.id;
        self.drafts.push(draft);
        id
    }

    /// Opens a draft holding a deep copy of an existing schema.
    pub fn start_edit_draft(&mut self, schema_id: EntityId) -> AppResult<EntityId> {
        let node = self
            .get::<SchemaNode>(schema_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Validation(format!("Schema with id {} not found", schema_id))
            })?;
        let draft = SchemaDraft {
            id: EntityId::new(),
            editing: Some(schema_id),
            node,
        };
        let id = draft.id;
        self.drafts.push(draft);
        Ok(id)
    }

    /// Mutable access to an open draft.
    pub fn draft_mut(&mut self, draft_id: EntityId) -> Option<&mut SchemaDraft> {
        self.drafts.iter_mut().find(|d| d.id == draft_id)
    }

    /// Drops a draft without saving.
    pub fn discard_draft(&mut self, draft_id: EntityId) -> AppResult<SchemaDraft> {
        let index = self.draft_index(draft_id)?;
        Ok(self.drafts.remove(index))
    }

    /// Saves a draft into the store and closes it.
    ///
    /// An edit replaces the schema by id; when the name changed, references
    /// across the store and the remaining drafts are rewritten. Returns the
    /// saved schema's id.
    pub fn submit_draft(&mut self, draft_id: EntityId) -> AppResult<EntityId> {
        let index = self.draft_index(draft_id)?;
        let mut node = self.drafts[index].node.clone();
        node.name = node.name.trim().to_string();
        if node.name.is_empty() {
            return Err(AppError::Validation(
                "Schema name must not be empty".to_string(),
            ));
        }
        strip_blank_enum_values(&mut node.shape);

        let saved_id = match self.drafts[index].editing {
            Some(schema_id) => {
                let old_name = self
                    .get::<SchemaNode>(schema_id)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| {
                        AppError::Validation(format!("Schema with id {} not found", schema_id))
                    })?;
                node.id = schema_id;
                let new_name = node.name.clone();
                self.replace(node)?;
                self.drafts.remove(index);
                if old_name != new_name {
                    propagate_rename(self, &old_name, &new_name);
                }
                schema_id
            }
            None => {
                let id = self.add(node)?;
                self.drafts.remove(index);
                id
            }
        };
        debug!(draft = %draft_id, schema = %saved_id, "Submitted schema draft");
        Ok(saved_id)
    }

    fn draft_index(&self, draft_id: EntityId) -> AppResult<usize> {
        self.drafts
            .iter()
            .position(|d| d.id == draft_id)
            .ok_or_else(|| AppError::Validation(format!("Draft with id {} not found", draft_id)))
    }
}

fn strip_blank_enum_values(shape: &mut NodeShape) {
    match shape {
        NodeShape::Enum { values } => {
            values.retain(|v| !v.trim().is_empty());
        }
        NodeShape::Object { fields } => {
            for field in fields {
                strip_blank_enum_values(&mut field.shape);
            }
        }
        NodeShape::Array { items } => strip_blank_enum_values(items),
        _ => {}
    }
}
