//! Size bucketing for free-text diameter and length descriptions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical tree-size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "extra large")]
    ExtraLarge,
}

impl SizeClass {
    /// All classes in keyword-check order.
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Large,
        SizeClass::ExtraLarge,
    ];

    /// Label written to the output table.
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
            SizeClass::ExtraLarge => "extra large",
        }
    }

    /// Parse a canonical label back into a class.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Substring patterns, matched against lower-cased input.
    ///
    /// This table is the survey vocabulary as exported. Medium and large mix
    /// length phrases with diameter phrases, and the capitalised "Diameter"
    /// entry can never match lower-cased input. Keep it as is.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            SizeClass::Small => &[
                "small",
                "< 10'",
                "<10'",
                "less than 10",
                "less than 10'",
                "anything less than 10",
                "small:",
            ],
            SizeClass::Medium => &[
                "medium",
                "10' and 25'",
                "between 10' and 25'",
                "between 10 and 25",
                "between 10' and 25' in length",
                "anything less than 1’",
                "anything less than 1'",
                "anything less than 1",
            ],
            SizeClass::Large => &[
                "large",
                "25' and 50'",
                "between 25' and 50'",
                "between 25' and 50' in length",
                "1’ – 2’",
                "1’ – 2’ Diameter",
                "1' – 2'",
            ],
            SizeClass::ExtraLarge => &[
                "very large",
                ">50",
                ">50'",
                "greater than 50",
                "more than 50",
                "very large: >50",
                ">2’",
                ">2'",
            ],
        }
    }

    /// Bucket a measurement: `<10`, `10-24`, `25-50`, `>50`.
    pub fn from_number(n: u64) -> Self {
        match n {
            0..=9 => SizeClass::Small,
            10..=24 => SizeClass::Medium,
            25..=50 => SizeClass::Large,
            _ => SizeClass::ExtraLarge,
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a value could not be bucketed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unclassified {
    /// Nothing to classify.
    Empty,
    /// No keyword matched and the value has no digits.
    NoMatch,
    /// The first run of digits holds a digit with no known decimal value.
    InvalidNumber(String),
}

/// Outcome of [`classify_size`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClassification {
    /// Matched the keyword table.
    Keyword(SizeClass),
    /// Bucketed from the first number in the text.
    Numeric(SizeClass),
    /// Left empty.
    Unclassified(Unclassified),
}

impl SizeClassification {
    /// The bucket, if any.
    pub fn class(&self) -> Option<SizeClass> {
        match self {
            SizeClassification::Keyword(c) | SizeClassification::Numeric(c) => Some(*c),
            SizeClassification::Unclassified(_) => None,
        }
    }

    /// Output cell value: the canonical label or the empty string.
    pub fn label(&self) -> &'static str {
        self.class().map(|c| c.label()).unwrap_or("")
    }
}

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid number regex"));

/// Code points of the digit zero in every decimal-digit block. Each block
/// runs zero through nine contiguously.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Decimal value of a digit character from any script.
fn digit_value(c: char) -> Option<u64> {
    let code = c as u32;
    let block = DIGIT_ZEROS.partition_point(|&zero| zero <= code);
    let zero = DIGIT_ZEROS[block.checked_sub(1)?];
    let value = code - zero;
    (value < 10).then_some(u64::from(value))
}

/// Integer value of a run of digits. Values past `u64::MAX` saturate, which
/// still buckets as extra large.
fn parse_digits(digits: &str) -> Option<u64> {
    digits.chars().try_fold(0u64, |acc, c| {
        let digit = digit_value(c)?;
        Some(acc.saturating_mul(10).saturating_add(digit))
    })
}

/// Classify a free-text size description.
///
/// Keywords are checked first, class by class in [`SizeClass::ALL`] order.
/// Without a keyword the first run of digits, in any script, is bucketed
/// with [`SizeClass::from_number`].
pub fn classify_size(value: &str) -> SizeClassification {
    if value.is_empty() {
        return SizeClassification::Unclassified(Unclassified::Empty);
    }

    let lowered = value.to_lowercase();

    for class in SizeClass::ALL {
        if class.keywords().iter().any(|kw| lowered.contains(kw)) {
            return SizeClassification::Keyword(class);
        }
    }

    let Some(digits) = FIRST_NUMBER.find(&lowered) else {
        return SizeClassification::Unclassified(Unclassified::NoMatch);
    };

    match parse_digits(digits.as_str()) {
        Some(n) => SizeClassification::Numeric(SizeClass::from_number(n)),
        None => SizeClassification::Unclassified(Unclassified::InvalidNumber(
            digits.as_str().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: &str) -> &'static str {
        classify_size(value).label()
    }

    #[test]
    fn test_keyword_classes() {
        assert_eq!(label("small tree"), "small");
        assert_eq!(label("Between 10' and 25'"), "medium");
        assert_eq!(label("between 25' and 50' in length"), "large");
        assert_eq!(label("greater than 50"), "extra large");
        assert_eq!(label(">2'"), "extra large");
        assert_eq!(label("Anything less than 1'"), "medium");
        assert_eq!(label("1’ – 2’ Diameter"), "large");
    }

    #[test]
    fn test_keyword_outcome_kind() {
        assert_eq!(
            classify_size("MEDIUM"),
            SizeClassification::Keyword(SizeClass::Medium)
        );
    }

    #[test]
    fn test_large_checked_before_very_large() {
        assert_eq!(label("Very large: >50'"), "large");
    }

    #[test]
    fn test_numeric_fallback() {
        assert_eq!(label("37 feet"), "large");
        assert_eq!(label("9"), "small");
        assert_eq!(label("about 10 ft"), "medium");
        assert_eq!(label("24in"), "medium");
        assert_eq!(label("25"), "large");
        assert_eq!(label("50 ft"), "large");
        assert_eq!(label("51"), "extra large");
        assert_eq!(
            classify_size("12 to 80"),
            SizeClassification::Numeric(SizeClass::Medium)
        );
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(
            classify_size(""),
            SizeClassification::Unclassified(Unclassified::Empty)
        );
        assert_eq!(
            classify_size("unknown"),
            SizeClassification::Unclassified(Unclassified::NoMatch)
        );
        assert_eq!(label("   "), "");
    }

    #[test]
    fn test_number_past_u64_is_extra_large() {
        assert_eq!(
            classify_size("99999999999999999999999 ft"),
            SizeClassification::Numeric(SizeClass::ExtraLarge)
        );
        assert_eq!(label("00000000000000000000000000007"), "small");
    }

    #[test]
    fn test_non_ascii_digits() {
        // Arabic-Indic thirty
        assert_eq!(
            classify_size("٣٠ ft"),
            SizeClassification::Numeric(SizeClass::Large)
        );
        assert_eq!(label("\u{96D} m"), "small");
        assert_eq!(label("\u{FF11}\u{FF12}"), "medium");
    }

    #[test]
    fn test_digit_value() {
        assert_eq!(digit_value('0'), Some(0));
        assert_eq!(digit_value('9'), Some(9));
        assert_eq!(digit_value('\u{669}'), Some(9));
        assert_eq!(digit_value('\u{1D7F6}'), Some(0));
        assert_eq!(digit_value('\u{1D7FF}'), Some(9));
        assert_eq!(digit_value('a'), None);
        assert_eq!(digit_value('\u{1F}'), None);
    }

    #[test]
    fn test_label_round_trip() {
        for class in SizeClass::ALL {
            assert_eq!(SizeClass::from_label(class.label()), Some(class));
        }
        assert_eq!(SizeClass::from_label("huge"), None);
    }
}
