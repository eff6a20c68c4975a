//! In-memory collaborators for tests and dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::error::{CanopyError, Result};

use super::store::{Document, DocumentStore, ImageFetcher, ObjectStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| CanopyError::Storage("in-memory store lock poisoned".to_string()))
}

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store that keeps uploads in a map and hands out `memory://` URLs.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fail_on: Vec<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject uploads whose name contains `pattern`.
    pub fn failing_on(mut self, pattern: impl Into<String>) -> Self {
        self.fail_on.push(pattern.into());
        self
    }

    /// Copy of the stored object, if any.
    pub fn object(&self, name: &str) -> Option<StoredObject> {
        lock(&self.objects).ok()?.get(name).cloned()
    }

    /// Names of all stored objects, sorted.
    pub fn names(&self) -> Vec<String> {
        lock(&self.objects)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        if self.fail_on.iter().any(|p| name.contains(p.as_str())) {
            return Err(CanopyError::Storage(format!("upload of '{}' rejected", name)));
        }
        lock(&self.objects)?.insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}", name))
    }
}

/// Document store backed by nested maps. Listing is ordered by id.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
    fail_on: Vec<String>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes of document `id`.
    pub fn failing_on(mut self, id: impl Into<String>) -> Self {
        self.fail_on.push(id.into());
        self
    }

    /// Copy of one document, if any.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        lock(&self.collections)
            .ok()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        lock(&self.collections)
            .map(|c| c.get(collection).map(|docs| docs.len()).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn set(&self, collection: &str, id: &str, fields: &Document) -> Result<()> {
        if self.fail_on.iter().any(|f| f == id) {
            return Err(CanopyError::Document {
                id: id.to_string(),
                message: "write rejected".to_string(),
            });
        }
        lock(&self.collections)?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields.clone());
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>> {
        Ok(lock(&self.collections)?
            .get(collection)
            .map(|docs| docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}

/// Fetcher serving canned bytes per URL; unknown URLs fail like a 404.
#[derive(Debug, Default)]
pub struct MemoryImageFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.images.insert(url.into(), bytes.into());
        self
    }
}

impl ImageFetcher for MemoryImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.images.get(url).cloned().ok_or_else(|| CanopyError::Fetch {
            url: url.to_string(),
            message: "status 404 Not Found".to_string(),
        })
    }
}
