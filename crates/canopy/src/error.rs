//! Error types for the canopy library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for canopy operations.
///
/// Per-row problems (missing columns, unparseable sizes, broken markup) are
/// never reported through this type; they degrade to empty values instead.
#[derive(Debug, Error)]
pub enum CanopyError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Downloading a source image failed.
    #[error("Fetch error for '{url}': {message}")]
    Fetch { url: String, message: String },

    /// The object store rejected an upload.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The document store rejected a read or write.
    #[error("Document error for '{id}': {message}")]
    Document { id: String, message: String },

    /// Listing a collection failed.
    #[error("Collection error for '{name}': {message}")]
    Collection { name: String, message: String },
}

impl CanopyError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CanopyError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for canopy operations.
pub type Result<T> = std::result::Result<T, CanopyError>;
