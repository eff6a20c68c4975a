//! Fuzz target for size classification.

#![no_main]

use canopy::SizeClass;
use canopy::normalize::classify_size;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let label = classify_size(&input).label();
    assert!(label.is_empty() || SizeClass::from_label(label).is_some());
});
