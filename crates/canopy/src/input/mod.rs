//! Input parsing and data source handling.

mod dialect;
mod parser;
mod source;

pub use dialect::{DEFAULT_SAMPLE_SIZE, Dialect};
pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, RawRecord, SourceMetadata};
