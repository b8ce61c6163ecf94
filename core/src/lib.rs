#![deny(missing_docs)]

//! # OAS Canvas Core
//!
//! Keeps an entity model and an OpenAPI 3.0 document in sync.
//!
//! - **selector**: the "what does this body point to" sum type and its string grammar.
//! - **model**: schemas, operations, reusable components and the `EntityStore`.
//! - **emitter**: `EntityStore` -> OpenAPI document.
//! - **importer**: OpenAPI document -> `EntityStore`.
//! - **rename**: reference rewriting when a schema is renamed.
//! - **orchestrator**: mutate, re-derive, publish, persist.

/// Shared error types.
pub mod error;

/// Shell defaults and workspace configuration.
pub mod config;

/// Document text: parsing, serialization and `$ref` helpers.
pub mod document;

/// Selector sum type and string grammar.
pub mod selector;

/// Entity model.
pub mod model;

/// Entity store to document.
pub mod emitter;

/// Document to entity store.
pub mod importer;

/// Rename propagation.
pub mod rename;

/// Blob storage boundary.
pub mod persistence;

/// Mutation and sync driver.
pub mod orchestrator;

/// The `openapi` version written into new documents.
pub const OPENAPI_VERSION: &str = "3.0.0";

pub use config::{CanvasConfig, ShellDefaults};
pub use document::{parse_document, serialize_document, DocumentFormat};
pub use emitter::emit;
pub use error::{AppError, AppResult};
pub use importer::{import_document, import_text};
pub use model::{EntityId, EntityStore};
pub use orchestrator::{ExportFile, Orchestrator};
pub use persistence::{BlobStore, DirBlobStore, MemoryBlobStore};
pub use rename::propagate_rename;
pub use selector::{ComponentKind, PrimitiveType, Selector};
