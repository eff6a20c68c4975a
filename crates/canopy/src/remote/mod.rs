//! Remote collaborators: image hosts, the object store and the document
//! database.
//!
//! The jobs only see [`ObjectStore`], [`DocumentStore`] and [`ImageFetcher`];
//! the HTTP clients and the in-memory fakes are interchangeable behind them.

mod config;
mod fetch;
mod firestore;
mod memory;
mod storage;
mod store;

pub use config::{DEFAULT_CONFIG_FILE, RemoteConfig};
pub use fetch::HttpImageFetcher;
pub use firestore::{Firestore, decode_value, encode_fields};
pub use memory::{MemoryDocumentStore, MemoryImageFetcher, MemoryObjectStore, StoredObject};
pub use storage::CloudStorage;
pub use store::{Document, DocumentStore, ImageFetcher, ObjectStore};
