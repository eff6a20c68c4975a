//! Canopy: cleaning for exported tree-inventory spreadsheets.
//!
//! A tree inventory exported from a mapping tool arrives as a delimited file
//! whose `Description` column is full of HTML, with an `<img>` tag standing in
//! for the photo and free-text size notes. Canopy turns every row into a fixed
//! nine-column record:
//!
//! ```text
//! X,Y,Name,Description,Date,Zone,Diameter,Length,Image
//! ```
//!
//! # Core Principles
//!
//! - **Never drop a row**: one output row per input row, in order
//! - **Degrade, don't fail**: missing columns and odd values become empty fields
//! - **Plain text out**: markup is stripped and sizes use four canonical labels
//!
//! # Example
//!
//! ```no_run
//! use canopy::CleanPipeline;
//!
//! let report = CleanPipeline::new()
//!     .run("trees.csv", "trees_cleaned.csv")
//!     .unwrap();
//!
//! println!("Rows: {}", report.rows);
//! println!("Images from markup: {}", report.extracted_images);
//! ```

pub mod error;
pub mod input;
pub mod jobs;
pub mod normalize;
pub mod output;
pub mod remote;

mod pipeline;

pub use error::{CanopyError, Result};
pub use input::{DataTable, Dialect, RawRecord, SourceMetadata};
pub use normalize::{CleanRecord, RowNormalizer, SizeClass};
pub use pipeline::{
    CleanConfig, CleanPipeline, CleanReport, CleanedTable, SizeTally, default_output_path,
};
