//! Parsed tables, raw records, and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::dialect::Dialect;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Encoding the file was read as.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }
}

/// One row of the source table keyed by column name, in header order.
///
/// Lookups of columns the row does not have yield the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: IndexMap<String, String>,
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion, mostly for tests.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a field. A repeated column name keeps the last value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value of a column, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(|s| s.as_str()).unwrap_or("")
    }

    /// Whether the column exists in this record (even if empty).
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order), padded or truncated to the header width.
    pub rows: Vec<Vec<String>>,
    /// The dialect the table was read with.
    pub dialect: Dialect,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, dialect: Dialect) -> Self {
        Self {
            headers,
            rows,
            dialect,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Build the keyed record for one row.
    pub fn record(&self, row: usize) -> Option<RawRecord> {
        let values = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .zip(values.iter())
                .map(|(h, v)| (h.as_str(), v.as_str()))
                .collect(),
        )
    }

    /// Iterate over all rows as keyed records, in input order.
    pub fn records(&self) -> impl Iterator<Item = RawRecord> + '_ {
        (0..self.rows.len()).filter_map(move |i| self.record(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_empty() {
        let record = RawRecord::new().with("Name", "Oak");
        assert_eq!(record.get("Name"), "Oak");
        assert_eq!(record.get("Image"), "");
        assert!(!record.contains("Image"));
    }

    #[test]
    fn test_duplicate_column_keeps_last() {
        let record: RawRecord = vec![("Zone", "1"), ("Zone", "2")].into_iter().collect();
        assert_eq!(record.get("Zone"), "2");
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_records_follow_header_order() {
        let table = DataTable::new(
            vec!["Name".into(), "Zone".into()],
            vec![
                vec!["Oak".into(), "1".into()],
                vec!["Elm".into(), "2".into()],
            ],
            Dialect::default(),
        );

        let records: Vec<RawRecord> = table.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("Name"), "Elm");
        let columns: Vec<&str> = records[0].iter().map(|(k, _)| k).collect();
        assert_eq!(columns, vec!["Name", "Zone"]);
        assert_eq!(table.column_index("Zone"), Some(1));
    }
}
