//! Push cleaned rows into the document store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::input::{DataTable, Parser, RawRecord};
use crate::remote::{Document, DocumentStore};

/// Table column to document field, in document order.
pub const DOCUMENT_FIELDS: [(&str, &str); 9] = [
    ("X", "x"),
    ("Y", "y"),
    ("Name", "name"),
    ("Description", "description"),
    ("Date", "date"),
    ("Zone", "zone"),
    ("Diameter", "diameter"),
    ("Length", "length"),
    ("Image", "image"),
];

/// Build the document for one row. Missing columns become empty fields.
pub fn document_from_record(record: &RawRecord) -> Document {
    DOCUMENT_FIELDS
        .iter()
        .map(|(column, field)| (field.to_string(), record.get(column).to_string()))
        .collect()
}

/// Document columns the table does not have, in document order.
pub fn missing_columns(table: &DataTable) -> Vec<&'static str> {
    DOCUMENT_FIELDS
        .iter()
        .map(|(column, _)| *column)
        .filter(|column| table.column_index(column).is_none())
        .collect()
}

/// Result of an upload run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub collection: String,
    pub documents: usize,
}

/// Writes one document per row, with ids `"1"`, `"2"`, ... in row order.
pub struct Uploader<'a> {
    store: &'a dyn DocumentStore,
    collection: String,
    parser: Parser,
}

impl<'a> Uploader<'a> {
    pub fn new(store: &'a dyn DocumentStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            parser: Parser::new(),
        }
    }

    /// Upload every row of a table. The first rejected write aborts the run;
    /// documents already written stay written.
    pub fn upload_table(&self, table: &DataTable) -> Result<usize> {
        let missing = missing_columns(table);
        if !missing.is_empty() {
            warn!(collection = %self.collection, ?missing, "columns absent, uploading empty fields");
        }

        let mut written = 0;
        for (i, record) in table.records().enumerate() {
            let id = (i + 1).to_string();
            self.store
                .set(&self.collection, &id, &document_from_record(&record))?;
            debug!(collection = %self.collection, id = %id, "document uploaded");
            written += 1;
        }
        Ok(written)
    }

    /// Parse `input` and upload its rows.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<UploadReport> {
        let (table, _) = self.parser.parse_file(input)?;
        let documents = self.upload_table(&table)?;

        info!(collection = %self.collection, documents, "upload complete");

        Ok(UploadReport {
            collection: self.collection.clone(),
            documents,
        })
    }
}

/// Every document in `collection`, as `(id, fields)`.
pub fn list_documents(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<(String, Document)>> {
    let documents = store.list(collection)?;
    debug!(collection, count = documents.len(), "documents listed");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanopyError;
    use crate::remote::MemoryDocumentStore;

    #[test]
    fn test_document_from_record() {
        let record = RawRecord::new()
            .with("Name", "Oak")
            .with("Zone", "3")
            .with("Extra", "ignored");
        let doc = document_from_record(&record);

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["x", "y", "name", "description", "date", "zone", "diameter", "length", "image"]
        );
        assert_eq!(doc["name"], "Oak");
        assert_eq!(doc["zone"], "3");
        assert_eq!(doc["x"], "");
    }

    #[test]
    fn test_upload_table_ids() {
        let table = Parser::new()
            .parse_bytes(b"Name,Zone\nOak,1\nElm,2\n")
            .unwrap();
        let store = MemoryDocumentStore::new();

        let written = Uploader::new(&store, "trees").upload_table(&table).unwrap();

        assert_eq!(written, 2);
        assert_eq!(store.document("trees", "1").unwrap()["name"], "Oak");
        assert_eq!(store.document("trees", "2").unwrap()["name"], "Elm");
    }

    #[test]
    fn test_missing_columns() {
        let table = Parser::new()
            .parse_bytes(b"X,Y,Name,Zone,Image
1,2,Oak,3,a.jpg
")
            .unwrap();
        assert_eq!(
            missing_columns(&table),
            vec!["Description", "Date", "Diameter", "Length"]
        );

        let full = Parser::new()
            .parse_bytes(b"X,Y,Name,Description,Date,Zone,Diameter,Length,Image
")
            .unwrap();
        assert!(missing_columns(&full).is_empty());
    }

    #[test]
    fn test_upload_aborts_on_rejection() {
        let table = Parser::new()
            .parse_bytes(b"Name\nOak\nElm\nAsh\n")
            .unwrap();
        let store = MemoryDocumentStore::new().failing_on("2");

        let err = Uploader::new(&store, "trees").upload_table(&table).unwrap_err();

        assert!(matches!(err, CanopyError::Document { ref id, .. } if id == "2"));
        assert_eq!(store.count("trees"), 1);
    }
}
