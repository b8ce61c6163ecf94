#![deny(missing_docs)]

//! # Orchestrator
//!
//! Owns the only mutable state: the entity store and the current document
//! text. Every committed mutation is followed by a sync pass:
//!
//! 1. parse the current document text as the shell,
//! 2. emit the store on top of it,
//! 3. serialize to YAML and publish the text to subscribers,
//! 4. persist the store and the text.
//!
//! A failed mutation or import leaves both the store and the text untouched.

use crate::config::ShellDefaults;
use crate::document::{default_shell, parse_document, serialize_document, DocumentFormat};
use crate::emitter::emit;
use crate::error::{AppError, AppResult};
use crate::importer::import_document;
use crate::model::{EntityStore, SchemaNode};
use crate::persistence::{clear_snapshot, load_snapshot, save_snapshot, BlobStore};
use crate::rename::propagate_rename;
use tracing::{info, warn};

/// File name used when exporting the document.
pub const EXPORT_FILE_NAME: &str = "openapi.yaml";

/// Callback notified with the document text after every publish.
pub type Subscriber = Box<dyn FnMut(&str)>;

/// A downloadable rendition of the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub file_name: &'static str,
    /// Document text as bytes.
    pub bytes: Vec<u8>,
}

/// Sequences mutate, re-derive, publish and persist.
pub struct Orchestrator<B: BlobStore> {
    store: EntityStore,
    document_text: String,
    defaults: ShellDefaults,
    blobs: B,
    subscribers: Vec<Subscriber>,
    last_error: Option<String>,
}

impl<B: BlobStore> Orchestrator<B> {
    /// A fresh workspace: empty store, default shell. Nothing is persisted yet.
    pub fn new(blobs: B, defaults: ShellDefaults) -> AppResult<Self> {
        let document_text = fresh_document_text(&defaults)?;
        Ok(Self {
            store: EntityStore::default(),
            document_text,
            defaults,
            blobs,
            subscribers: Vec::new(),
            last_error: None,
        })
    }

    /// Restores a previously persisted workspace, or starts fresh when none exists.
    ///
    /// Malformed store JSON is a persistence error.
    pub fn hydrate(blobs: B, defaults: ShellDefaults) -> AppResult<Self> {
        let snapshot = load_snapshot(&blobs)?;
        let mut orchestrator = Self::new(blobs, defaults)?;
        if let Some(snapshot) = snapshot {
            orchestrator.store = snapshot.store;
            if let Some(text) = snapshot.document {
                orchestrator.document_text = text;
            }
            info!(
                schemas = orchestrator.store.schemas.len(),
                operations = orchestrator.store.operations.len(),
                "Hydrated workspace"
            );
        }
        Ok(orchestrator)
    }

    /// The current entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The current document text.
    pub fn document_text(&self) -> &str {
        &self.document_text
    }

    /// The message of the last failed sync or import, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The blob store.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Registers a callback for published document text.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&str) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Applies `f` to a copy of the store and commits it only if `f` succeeds,
    /// then syncs the document.
    ///
    /// A sync failure is returned, but the committed store is kept.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut EntityStore) -> AppResult<T>) -> AppResult<T> {
        let mut next = self.store.clone();
        let out = f(&mut next)?;
        self.store = next;
        self.sync()?;
        Ok(out)
    }

    /// Re-derives the document from the store and publishes it.
    ///
    /// When the current text does not parse, the cycle is skipped and the
    /// error is recorded and returned.
    pub fn sync(&mut self) -> AppResult<()> {
        let shell = match parse_document(&self.document_text, DocumentFormat::Yaml) {
            Ok(shell) => shell,
            Err(e) => {
                let err = AppError::Shell(format!("Current document could not be parsed: {}", e));
                warn!(error = %err, "Skipping sync");
                self.last_error = Some(err.to_string());
                save_snapshot(&mut self.blobs, &self.store, &self.document_text)?;
                return Err(err);
            }
        };
        let doc = emit(&self.store, &shell)?;
        let text = serialize_document(&doc, DocumentFormat::Yaml)?;
        self.publish(text)
    }

    /// Stores a hand edit of the document text without re-emitting.
    pub fn set_document_text(&mut self, text: impl Into<String>) -> AppResult<()> {
        self.document_text = text.into();
        save_snapshot(&mut self.blobs, &self.store, &self.document_text)
    }

    /// Imports document text, replacing the store wholesale.
    ///
    /// The format comes from `hint` (`.json` is JSON, anything else YAML).
    /// Default tags carry over. The imported document becomes the shell of the
    /// re-emission. On failure nothing changes.
    pub fn import_text(&mut self, text: &str, hint: &str) -> AppResult<()> {
        let result = parse_document(text, DocumentFormat::from_hint(hint)).and_then(|doc| {
            let mut store = import_document(&doc)?;
            store.default_tags_text = self.store.default_tags_text.clone();
            let emitted = emit(&store, &doc)?;
            let text = serialize_document(&emitted, DocumentFormat::Yaml)?;
            Ok((store, text))
        });
        match result {
            Ok((store, text)) => {
                self.store = store;
                self.publish(text)
            }
            Err(e) => {
                warn!(error = %e, "Import failed, workspace unchanged");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Resets to an empty store and the default shell, and drops the persisted blobs.
    pub fn clear(&mut self) -> AppResult<()> {
        self.store = EntityStore::default();
        self.document_text = fresh_document_text(&self.defaults)?;
        self.last_error = None;
        clear_snapshot(&mut self.blobs)?;
        self.notify();
        info!("Cleared workspace");
        Ok(())
    }

    /// The current document as `openapi.yaml`.
    pub fn export(&self) -> ExportFile {
        ExportFile {
            file_name: EXPORT_FILE_NAME,
            bytes: self.document_text.as_bytes().to_vec(),
        }
    }

    /// Replaces the document-wide default tags.
    pub fn set_default_tags(&mut self, text: impl Into<String>) -> AppResult<()> {
        let text = text.into();
        self.mutate(|store| {
            store.default_tags_text = text;
            Ok(())
        })
    }

    /// Renames a schema and rewrites every reference to it.
    ///
    /// Returns the number of rewritten references.
    pub fn rename_schema(&mut self, old: &str, new: &str) -> AppResult<usize> {
        let new = new.trim().to_string();
        let old = old.to_string();
        self.mutate(move |store| {
            let mut node = store
                .find::<SchemaNode>(&old)
                .cloned()
                .ok_or_else(|| AppError::Validation(format!("Schema '{}' not found", old)))?;
            node.name = new.clone();
            store.replace(node)?;
            Ok(propagate_rename(store, &old, &new))
        })
    }

    fn publish(&mut self, text: String) -> AppResult<()> {
        self.document_text = text;
        self.last_error = None;
        self.notify();
        save_snapshot(&mut self.blobs, &self.store, &self.document_text)
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.document_text);
        }
    }
}

fn fresh_document_text(defaults: &ShellDefaults) -> AppResult<String> {
    serialize_document(&default_shell(defaults), DocumentFormat::Yaml)
}
