//! Output tables.

mod writer;

pub use writer::{save_clean_records, save_records, write_clean_records, write_records};
