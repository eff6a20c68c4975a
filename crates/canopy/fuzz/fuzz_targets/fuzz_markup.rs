//! Fuzz target for markup handling.
//!
//! Stripping must be idempotent and the extracted image reference must come
//! from the input.

#![no_main]

use canopy::normalize::{extract_image_reference, strip_markup};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let once = strip_markup(&input);
    assert_eq!(strip_markup(&once), once);

    if let Some(src) = extract_image_reference(&input) {
        assert!(input.contains(src));
    }
});
