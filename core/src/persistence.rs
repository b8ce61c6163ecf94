#![deny(missing_docs)]

//! # Persistence
//!
//! The core only needs get/set/remove over named string blobs. A workspace is
//! saved as two blobs: the store as JSON and the current document text.

use crate::error::{AppError, AppResult};
use crate::model::EntityStore;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blob key of the serialized entity store.
pub const STORE_KEY: &str = "oas-canvas.store";

/// Blob key of the current document text.
pub const DOCUMENT_KEY: &str = "oas-canvas.document";

/// Named string blob storage.
pub trait BlobStore {
    /// Reads a blob; `None` when the key was never written.
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    /// Writes a blob, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    /// Deletes a blob. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

/// Blobs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    /// Opens (and creates if needed) the directory.
    pub fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The backing directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(AppError::Persistence(format!("Invalid blob key '{}'", key)));
        }
        Ok(self.root.join(key))
    }
}

impl BlobStore for DirBlobStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        fs::write(&path, value)?;
        debug!(path = %path.display(), "Wrote blob");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A persisted workspace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// The entity store.
    pub store: EntityStore,
    /// The document text, if one was saved.
    pub document: Option<String>,
}

/// Writes both workspace blobs.
pub fn save_snapshot(blobs: &mut dyn BlobStore, store: &EntityStore, document: &str) -> AppResult<()> {
    let json = serde_json::to_string(store)
        .map_err(|e| AppError::Persistence(format!("Failed to encode store: {}", e)))?;
    blobs.set(STORE_KEY, &json)?;
    blobs.set(DOCUMENT_KEY, document)?;
    Ok(())
}

/// Reads the workspace blobs. `None` when nothing was saved yet.
pub fn load_snapshot(blobs: &dyn BlobStore) -> AppResult<Option<Snapshot>> {
    let store_json = blobs.get(STORE_KEY)?;
    let document = blobs.get(DOCUMENT_KEY)?;
    if store_json.is_none() && document.is_none() {
        return Ok(None);
    }
    let store = match store_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| AppError::Persistence(format!("Failed to decode store: {}", e)))?,
        None => EntityStore::default(),
    };
    Ok(Some(Snapshot { store, document }))
}

/// Removes both workspace blobs.
pub fn clear_snapshot(blobs: &mut dyn BlobStore) -> AppResult<()> {
    blobs.remove(STORE_KEY)?;
    blobs.remove(DOCUMENT_KEY)
}
