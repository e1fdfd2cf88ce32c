//! HTML escaping helpers.
//!
//! Thin wrappers over `htmlize` so every crate escapes and decodes the same way.

use std::borrow::Cow;

/// Escape text content (`&`, `<`, `>`).
#[inline]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    htmlize::escape_text(text)
}

/// Escape an attribute value for use inside double quotes.
#[inline]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    htmlize::escape_attribute(value)
}

/// Decode character references (`&amp;`, `&#39;`, ...) in text content.
#[inline]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    htmlize::unescape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert!(matches!(decode_entities("no refs"), Cow::Borrowed(_)));
    }
}
