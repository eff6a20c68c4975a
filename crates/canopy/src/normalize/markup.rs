//! Best-effort HTML handling for free-text description fields.
//!
//! This is a regex sanitizer, not an HTML parser. Nested or malformed markup
//! can leave stray characters behind.

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::decode_entities;

/// First `<img ...>` tag with a double- or single-quoted `src`.
static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img\s+[^>]*src=(?:"([^"]+)"|'([^']+)')"#).expect("valid image regex")
});

/// Anything between angle brackets.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Return the `src` URL of the first image tag in `html`, if any.
///
/// ```
/// use canopy::normalize::extract_image_reference;
///
/// assert_eq!(
///     extract_image_reference(r#"<img src="http://x/a.jpg">"#),
///     Some("http://x/a.jpg")
/// );
/// assert_eq!(extract_image_reference("no tag here"), None);
/// ```
pub fn extract_image_reference(html: &str) -> Option<&str> {
    if html.is_empty() {
        return None;
    }
    let caps = IMG_SRC.captures(html)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Decode entities, drop tags, and trim.
///
/// Decoding and tag removal repeat until the text is stable, so
/// double-escaped exports such as `&amp;lt;b&amp;gt;` are fully cleaned and
/// `strip_markup(&strip_markup(x)) == strip_markup(x)` holds.
///
/// ```
/// use canopy::normalize::strip_markup;
///
/// assert_eq!(strip_markup("<b>Oak &amp; Elm</b>"), "Oak & Elm");
/// ```
pub fn strip_markup(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = {
            let decoded = decode_entities(&current);
            TAG.replace_all(&decoded, "").trim().to_string()
        };
        if next == current {
            return current;
        }
        current = next;
    }
}

/// [`strip_markup`] for a field that may be missing altogether.
pub fn strip_optional_markup(text: Option<&str>) -> String {
    text.map(strip_markup).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_double_quoted() {
        assert_eq!(
            extract_image_reference(r#"<p>Oak</p><img src="http://x/a.jpg">"#),
            Some("http://x/a.jpg")
        );
    }

    #[test]
    fn test_extract_single_quoted_with_attributes() {
        assert_eq!(
            extract_image_reference("<IMG class='photo' SRC='https://cdn/tree.png' alt=''>"),
            Some("https://cdn/tree.png")
        );
    }

    #[test]
    fn test_extract_first_image_only() {
        let html = r#"<img src="one.jpg"><img src="two.jpg">"#;
        assert_eq!(extract_image_reference(html), Some("one.jpg"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_image_reference(""), None);
        assert_eq!(extract_image_reference("no tag here"), None);
        assert_eq!(extract_image_reference("<img alt=\"x\">"), None);
        assert_eq!(extract_image_reference("<img src=\"\">"), None);
    }

    #[test]
    fn test_strip_basic() {
        assert_eq!(strip_markup("<b>Oak &amp; Elm</b>"), "Oak & Elm");
        assert_eq!(strip_markup("  <p>Red maple</p>\n"), "Red maple");
        assert_eq!(strip_markup("plain"), "plain");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_strip_encoded_tags() {
        assert_eq!(strip_markup("&lt;i&gt;Quercus&lt;/i&gt; rubra"), "Quercus rubra");
        assert_eq!(strip_markup("&amp;lt;b&amp;gt;bold&amp;lt;/b&amp;gt;"), "bold");
    }

    #[test]
    fn test_strip_decodes_like_a_browser() {
        assert_eq!(strip_markup("Oak &amp Elm"), "Oak & Elm");
        assert_eq!(strip_markup("x &#150; y"), "x \u{2013} y");
        assert_eq!(strip_markup("&ltb&gtWillow&lt/b&gt"), "Willow");
    }

    #[test]
    fn test_strip_keeps_lone_brackets() {
        assert_eq!(strip_markup("height < 10 ft"), "height < 10 ft");
        assert_eq!(strip_markup("a <> b"), "a <> b");
    }

    #[test]
    fn test_strip_idempotent_on_awkward_input() {
        for input in [
            "<<b>>x",
            "&am<b>p;lt;",
            "&amp;amp;amp;",
            "<a href='x'>link</a> &nbsp; text",
            "1 < 2 > 0",
        ] {
            let once = strip_markup(input);
            assert_eq!(strip_markup(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_strip_optional() {
        assert_eq!(strip_optional_markup(None), "");
        assert_eq!(strip_optional_markup(Some("<i>x</i>")), "x");
    }
}
