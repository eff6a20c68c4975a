//! Character-reference decoding following the HTML5 rules browsers apply.
//!
//! Named references with a semicolon resolve through `html_escape`'s entity
//! table. On top of that, legacy names are accepted without the semicolon
//! (`&amp Elm`) and numeric references in the C1 range take their
//! Windows-1252 meaning (`&#150;` is an en dash).

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|([A-Za-z][A-Za-z0-9]*))(;?)")
        .expect("valid character reference regex")
});

/// Named references that resolve even when the semicolon is missing.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Meaning of `&#128;` through `&#159;`. Positions Windows-1252 leaves
/// undefined keep their own code point.
const WINDOWS_1252_C1: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Decode every character reference in `text`.
///
/// ```
/// use canopy::normalize::decode_entities;
///
/// assert_eq!(decode_entities("Oak &amp; Elm"), "Oak & Elm");
/// assert_eq!(decode_entities("Oak &amp Elm"), "Oak & Elm");
/// assert_eq!(decode_entities("1927 &#150; 1931"), "1927 \u{2013} 1931");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    REFERENCE.replace_all(text, |caps: &Captures| {
        let semicolon = !caps[4].is_empty();
        if let Some(hex) = caps.get(1) {
            numeric_reference(u32::from_str_radix(hex.as_str(), 16).ok())
        } else if let Some(decimal) = caps.get(2) {
            numeric_reference(decimal.as_str().parse().ok())
        } else {
            named_reference(&caps[3], semicolon).unwrap_or_else(|| caps[0].to_string())
        }
    })
}

/// Resolve `&#N;`. `None` stands for a value too large to parse.
fn numeric_reference(code: Option<u32>) -> String {
    const REPLACEMENT: &str = "\u{FFFD}";

    let Some(code) = code else {
        return REPLACEMENT.to_string();
    };
    match code {
        0x80..=0x9F => WINDOWS_1252_C1[(code - 0x80) as usize].to_string(),
        0x00 | 0xD800..=0xDFFF | 0x11_0000.. => REPLACEMENT.to_string(),
        0x0D => "\r".to_string(),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => String::new(),
        c if c & 0xFFFE == 0xFFFE => String::new(),
        c => char::from_u32(c).map(String::from).unwrap_or_default(),
    }
}

/// Resolve `&name;` or `&name`, falling back to the longest legacy name that
/// prefixes `name`. The unmatched tail is kept.
fn named_reference(name: &str, semicolon: bool) -> Option<String> {
    if semicolon {
        let reference = format!("&{};", name);
        let decoded = html_escape::decode_html_entities(&reference);
        if decoded != reference.as_str() {
            return Some(decoded.into_owned());
        }
    }

    let end = (2..=name.len())
        .rev()
        .find(|&end| LEGACY_NAMES.contains(&&name[..end]))?;
    let mut decoded = html_escape::decode_html_entities(&format!("&{};", &name[..end])).into_owned();
    decoded.push_str(&name[end..]);
    if semicolon {
        decoded.push(';');
    }
    Some(decoded)
}
