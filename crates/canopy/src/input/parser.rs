//! Delimited-text reader with dialect sniffing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CanopyError, Result};
use super::dialect::{DEFAULT_SAMPLE_SIZE, Dialect};
use super::source::{DataTable, SourceMetadata};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Dialect to use (None = sniff from the sample).
    pub dialect: Option<Dialect>,
    /// Number of leading bytes inspected when sniffing.
    pub sample_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Reads header-first delimited files into a [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    ///
    /// The only failures are I/O on the file itself and malformed delimited
    /// data (for example bytes that are not UTF-8).
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CanopyError::io(path, e))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CanopyError::io(path, e))?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            table.dialect.format().to_string(),
            table.row_count(),
            table.column_count(),
        );

        debug!(
            file = %source_metadata.file,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed table"
        );

        Ok((table, source_metadata))
    }

    /// Parse in-memory bytes.
    ///
    /// An empty input, or one holding only a header, yields a table with no rows.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let dialect = self
            .config
            .dialect
            .unwrap_or_else(|| Dialect::sniff(bytes, self.config.sample_size));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        let expected_cols = headers.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Short rows are padded, long rows lose their extra fields.
            row.resize(expected_cols, String::new());

            rows.push(row);
        }

        Ok(DataTable::new(headers, rows, dialect))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
