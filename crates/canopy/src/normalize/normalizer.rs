//! Raw row to clean row.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::input::RawRecord;

use super::markup::{extract_image_reference, strip_markup};
use super::record::CleanRecord;
use super::size::{SizeClassification, classify_size};

/// Where a row's image URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// The row's own non-blank Image column.
    Explicit,
    /// The first `<img>` tag in Description.
    Description,
    /// No image.
    None,
}

/// A clean row together with how each derived field was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub record: CleanRecord,
    pub image_source: ImageSource,
    pub diameter: SizeClassification,
    pub length: SizeClassification,
}

/// Turns raw survey rows into [`CleanRecord`]s.
///
/// Stateless: every row is transformed on its own and no field can make the
/// transformation fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowNormalizer;

impl RowNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Transform one row.
    pub fn transform_row(&self, raw: &RawRecord) -> CleanRecord {
        self.normalize(raw).record
    }

    /// Transform one row and keep the per-field outcomes.
    pub fn normalize(&self, raw: &RawRecord) -> NormalizedRow {
        let description = raw.get("Description");

        let explicit_image = raw.get("Image").trim();
        let (image, image_source) = if !explicit_image.is_empty() {
            (explicit_image.to_string(), ImageSource::Explicit)
        } else {
            match extract_image_reference(description) {
                Some(src) => (src.to_string(), ImageSource::Description),
                None => (String::new(), ImageSource::None),
            }
        };

        let diameter = classify_size(raw.get("Diameter"));
        let length = classify_size(raw.get("Length"));

        let record = CleanRecord {
            x: raw.get("X").to_string(),
            y: raw.get("Y").to_string(),
            name: raw.get("Name").to_string(),
            description: strip_markup(description),
            date: raw.get("Date").to_string(),
            zone: raw.get("Zone").to_string(),
            diameter: diameter.label().to_string(),
            length: length.label().to_string(),
            image,
        };

        trace!(name = %record.name, ?image_source, "normalized row");

        NormalizedRow {
            record,
            image_source,
            diameter,
            length,
        }
    }
}
