//! Contracts for the out-of-process collaborators.

use indexmap::IndexMap;

use crate::error::Result;

/// A flat document: field name to string value, in insertion order.
pub type Document = IndexMap<String, String>;

/// Blob storage that can serve uploaded objects publicly.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `name` and return a publicly reachable URL.
    fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Document database holding flat string records.
pub trait DocumentStore: Send + Sync {
    /// Create or replace the document `id` in `collection`.
    fn set(&self, collection: &str, id: &str, fields: &Document) -> Result<()>;

    /// Every document in `collection`, as `(id, fields)`.
    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>>;
}

/// Source of image bytes.
pub trait ImageFetcher: Send + Sync {
    /// Download `url`. Anything but a 200 response is an error.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
