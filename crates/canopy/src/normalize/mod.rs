//! Row cleaning: markup removal, image extraction, and size bucketing.

mod entities;
mod markup;
mod normalizer;
mod record;
mod size;

pub use entities::decode_entities;
pub use markup::{extract_image_reference, strip_markup, strip_optional_markup};
pub use normalizer::{ImageSource, NormalizedRow, RowNormalizer};
pub use record::{CLEAN_COLUMNS, CleanRecord};
pub use size::{SizeClass, SizeClassification, Unclassified, classify_size};
