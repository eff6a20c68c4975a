//! Fuzz target for the reader and the clean pipeline.
//!
//! Checks that sniffing and parsing never panic, and that every parsed row
//! produces exactly one clean record.

#![no_main]

use canopy::CleanPipeline;
use canopy::input::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(table) = Parser::new().parse_bytes(data) {
        let cleaned = CleanPipeline::new().clean_table(&table);
        assert_eq!(cleaned.records.len(), table.row_count());
    }
});
