//! The clean pipeline: read, normalize every row, write.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::input::{DataTable, Dialect, Parser, ParserConfig, SourceMetadata};
use crate::normalize::{CleanRecord, ImageSource, RowNormalizer, SizeClassification};
use crate::output::save_clean_records;

/// Configuration for a clean run.
#[derive(Debug, Clone, Default)]
pub struct CleanConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
}

impl CleanConfig {
    /// Force a dialect instead of sniffing one.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.parser.dialect = Some(dialect);
        self
    }

    /// Number of leading bytes inspected when sniffing.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.parser.sample_size = sample_size;
        self
    }
}

/// How many values took each classification path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTally {
    pub keyword: usize,
    pub numeric: usize,
    pub unclassified: usize,
}

impl SizeTally {
    fn record(&mut self, outcome: &SizeClassification) {
        match outcome {
            SizeClassification::Keyword(_) => self.keyword += 1,
            SizeClassification::Numeric(_) => self.numeric += 1,
            SizeClassification::Unclassified(_) => self.unclassified += 1,
        }
    }
}

/// Summary of a clean run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Dialect the input was read with.
    pub dialect: Dialect,
    /// Where the clean table was written.
    pub output: PathBuf,
    /// Number of rows processed (equal to rows written).
    pub rows: usize,
    /// Rows whose image came from an explicit Image column.
    pub explicit_images: usize,
    /// Rows whose image was pulled out of Description markup.
    pub extracted_images: usize,
    /// Rows left without an image.
    pub missing_images: usize,
    /// How the Diameter column was classified.
    pub diameter: SizeTally,
    /// How the Length column was classified.
    pub length: SizeTally,
}

/// Records plus tallies, before anything is written.
#[derive(Debug, Clone, Default)]
pub struct CleanedTable {
    /// One clean record per input row, in input order.
    pub records: Vec<CleanRecord>,
    /// Rows whose image came from an explicit Image column.
    pub explicit_images: usize,
    /// Rows whose image was pulled out of Description markup.
    pub extracted_images: usize,
    /// Rows left without an image.
    pub missing_images: usize,
    /// How the Diameter column was classified.
    pub diameter: SizeTally,
    /// How the Length column was classified.
    pub length: SizeTally,
}

/// Runs the clean pipeline.
pub struct CleanPipeline {
    parser: Parser,
    normalizer: RowNormalizer,
}

impl CleanPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: CleanConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            normalizer: RowNormalizer::new(),
        }
    }

    /// Normalize every row of an already-parsed table, in order.
    pub fn clean_table(&self, table: &DataTable) -> CleanedTable {
        let mut cleaned = CleanedTable {
            records: Vec::with_capacity(table.row_count()),
            ..CleanedTable::default()
        };

        for raw in table.records() {
            let row = self.normalizer.normalize(&raw);
            match row.image_source {
                ImageSource::Explicit => cleaned.explicit_images += 1,
                ImageSource::Description => cleaned.extracted_images += 1,
                ImageSource::None => cleaned.missing_images += 1,
            }
            cleaned.diameter.record(&row.diameter);
            cleaned.length.record(&row.length);
            cleaned.records.push(row.record);
        }

        cleaned
    }

    /// Clean `input` and write the result to `output`.
    ///
    /// The whole input is read before anything is written. Only I/O on the
    /// two files (and undecodable input) can fail.
    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CleanReport> {
        let output = output.as_ref();

        let (table, source) = self.parser.parse_file(input)?;
        let cleaned = self.clean_table(&table);

        save_clean_records(output, &cleaned.records)?;

        info!(
            rows = cleaned.records.len(),
            output = %output.display(),
            "cleaned table written"
        );

        Ok(CleanReport {
            source,
            dialect: table.dialect,
            output: output.to_path_buf(),
            rows: cleaned.records.len(),
            explicit_images: cleaned.explicit_images,
            extracted_images: cleaned.extracted_images,
            missing_images: cleaned.missing_images,
            diameter: cleaned.diameter,
            length: cleaned.length,
        })
    }
}

impl Default for CleanPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Default output path: `<stem><suffix>.csv` next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}.csv", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_table_tallies() {
        let parser = Parser::new();
        let table = parser
            .parse_bytes(
                b"Name,Description,Diameter,Length,Image\n\
                  Oak,<img src='a.jpg'>,small,12,\n\
                  Elm,plain,,huge,b.jpg\n\
                  Ash,,medium,,\n",
            )
            .unwrap();

        let cleaned = CleanPipeline::new().clean_table(&table);

        assert_eq!(cleaned.records.len(), 3);
        assert_eq!(cleaned.extracted_images, 1);
        assert_eq!(cleaned.explicit_images, 1);
        assert_eq!(cleaned.missing_images, 1);
        assert_eq!(
            cleaned.diameter,
            SizeTally {
                keyword: 2,
                numeric: 0,
                unclassified: 1
            }
        );
        assert_eq!(
            cleaned.length,
            SizeTally {
                keyword: 0,
                numeric: 1,
                unclassified: 2
            }
        );
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/trees2.csv"), "_cleaned"),
            PathBuf::from("data/trees2_cleaned.csv")
        );
    }
}
