//! Copy row images into the object store and point the table at the copies.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::input::{DataTable, Parser, RawRecord, SourceMetadata};
use crate::output::save_records;
use crate::remote::{ImageFetcher, ObjectStore};

/// Content type every re-hosted image is stored under.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Remove the literal word `Zone` from a zone label and trim.
///
/// ```
/// use canopy::jobs::strip_zone_label;
///
/// assert_eq!(strip_zone_label("Zone 4"), "4");
/// assert_eq!(strip_zone_label(" 12 "), "12");
/// ```
pub fn strip_zone_label(zone: &str) -> String {
    zone.replace("Zone", "").trim().to_string()
}

/// What happened to one row's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RehostOutcome {
    /// Uploaded; the row now points at this URL.
    Rehosted(String),
    /// Fetch or upload failed; the row keeps its original URL.
    Failed,
    /// Nothing to re-host.
    NoImage,
}

/// Summary of a rehost run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehostTally {
    pub rows: usize,
    pub rehosted: usize,
    pub failed: usize,
    pub without_image: usize,
}

impl RehostTally {
    fn record(&mut self, outcome: &RehostOutcome) {
        self.rows += 1;
        match outcome {
            RehostOutcome::Rehosted(_) => self.rehosted += 1,
            RehostOutcome::Failed => self.failed += 1,
            RehostOutcome::NoImage => self.without_image += 1,
        }
    }
}

/// Result of [`Rehoster::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehostReport {
    pub source: SourceMetadata,
    pub output: PathBuf,
    pub tally: RehostTally,
}

/// Re-hosts images one row at a time, in input order.
pub struct Rehoster<'a> {
    fetcher: &'a dyn ImageFetcher,
    store: &'a dyn ObjectStore,
    object_prefix: String,
    parser: Parser,
}

impl<'a> Rehoster<'a> {
    pub fn new(fetcher: &'a dyn ImageFetcher, store: &'a dyn ObjectStore) -> Self {
        Self {
            fetcher,
            store,
            object_prefix: "trees/".to_string(),
            parser: Parser::new(),
        }
    }

    /// Prefix for object names (default `trees/`).
    pub fn with_object_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.object_prefix = prefix.into();
        self
    }

    /// Object name for the `index`th row (1-based).
    pub fn object_name(&self, index: usize) -> String {
        format!("{}tree_{}.jpg", self.object_prefix, index)
    }

    /// Re-host one row in place. Never fails; problems are logged and the
    /// original Image value is kept.
    pub fn rehost_record(&self, index: usize, record: &mut RawRecord) -> RehostOutcome {
        if record.contains("Zone") {
            let zone = strip_zone_label(record.get("Zone"));
            record.insert("Zone", zone);
        }

        let url = record.get("Image").trim().to_string();
        if url.is_empty() {
            debug!(row = index, "no image to re-host");
            return RehostOutcome::NoImage;
        }

        let name = self.object_name(index);
        let uploaded = self
            .fetcher
            .fetch(&url)
            .and_then(|bytes| self.store.put(&name, bytes, IMAGE_CONTENT_TYPE));

        match uploaded {
            Ok(public_url) => {
                debug!(row = index, object = %name, "image re-hosted");
                record.insert("Image", public_url.clone());
                RehostOutcome::Rehosted(public_url)
            }
            Err(e) => {
                warn!(row = index, url = %url, error = %e, "image not re-hosted");
                RehostOutcome::Failed
            }
        }
    }

    /// Re-host every row of a table, returning the rewritten records.
    pub fn rehost_table(&self, table: &DataTable) -> (Vec<RawRecord>, RehostTally) {
        let mut tally = RehostTally::default();
        let records = table
            .records()
            .enumerate()
            .map(|(i, mut record)| {
                let outcome = self.rehost_record(i + 1, &mut record);
                tally.record(&outcome);
                record
            })
            .collect();
        (records, tally)
    }

    /// Re-host `input` and write the result to `output` with the same header.
    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RehostReport> {
        let output = output.as_ref();

        let (table, source) = self.parser.parse_file(input)?;
        let (records, tally) = self.rehost_table(&table);

        save_records(output, &table.headers, &records)?;

        info!(
            rows = tally.rows,
            rehosted = tally.rehosted,
            failed = tally.failed,
            output = %output.display(),
            "re-hosted table written"
        );

        Ok(RehostReport {
            source,
            output: output.to_path_buf(),
            tally,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryImageFetcher, MemoryObjectStore};

    #[test]
    fn test_strip_zone_label() {
        assert_eq!(strip_zone_label("Zone 4"), "4");
        assert_eq!(strip_zone_label("4"), "4");
        assert_eq!(strip_zone_label(""), "");
        assert_eq!(strip_zone_label("zone 4"), "zone 4");
    }

    #[test]
    fn test_rehost_record_success() {
        let fetcher = MemoryImageFetcher::new().with_image("http://x/a.jpg", b"jpeg".to_vec());
        let store = MemoryObjectStore::new();
        let rehoster = Rehoster::new(&fetcher, &store);

        let mut record = RawRecord::new()
            .with("Zone", "Zone 2")
            .with("Image", " http://x/a.jpg ");
        let outcome = rehoster.rehost_record(3, &mut record);

        assert_eq!(
            outcome,
            RehostOutcome::Rehosted("memory://trees/tree_3.jpg".to_string())
        );
        assert_eq!(record.get("Zone"), "2");
        assert_eq!(record.get("Image"), "memory://trees/tree_3.jpg");
        let stored = store.object("trees/tree_3.jpg").unwrap();
        assert_eq!(stored.content_type, IMAGE_CONTENT_TYPE);
    }

    #[test]
    fn test_rehost_record_failure_keeps_url() {
        let fetcher = MemoryImageFetcher::new();
        let store = MemoryObjectStore::new();
        let rehoster = Rehoster::new(&fetcher, &store);

        let mut record = RawRecord::new().with("Image", "http://gone/b.jpg");
        assert_eq!(rehoster.rehost_record(1, &mut record), RehostOutcome::Failed);
        assert_eq!(record.get("Image"), "http://gone/b.jpg");
        assert!(store.names().is_empty());
    }

    #[test]
    fn test_rehost_record_without_zone_column() {
        let fetcher = MemoryImageFetcher::new();
        let store = MemoryObjectStore::new();
        let rehoster = Rehoster::new(&fetcher, &store);

        let mut record = RawRecord::new().with("Name", "Oak");
        let outcome = rehoster.rehost_record(1, &mut record);

        assert_eq!(outcome, RehostOutcome::NoImage);
        assert!(!record.contains("Zone"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_object_prefix() {
        let fetcher = MemoryImageFetcher::new();
        let store = MemoryObjectStore::new();
        let rehoster = Rehoster::new(&fetcher, &store).with_object_prefix("park/");
        assert_eq!(rehoster.object_name(9), "park/tree_9.jpg");
    }
}
