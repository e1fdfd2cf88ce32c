//! HTML tag tables used by the parser and the printer.

use phf::phf_set;

/// Elements that never have children or an end tag.
static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Elements whose content is kept verbatim until the matching end tag.
static RAW_TEXT_TAGS: phf::Set<&'static str> = phf_set! {
    "script", "style", "textarea", "title",
};

/// Check if a tag is a void element (`<br>`, `<img>`, ...).
#[inline]
pub fn is_void_tag(tag: &str) -> bool {
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        return VOID_TAGS.contains(tag.to_ascii_lowercase().as_str());
    }
    VOID_TAGS.contains(tag)
}

/// Check if a tag holds raw text (`<script>`, `<style>`, ...).
#[inline]
pub fn is_raw_text_tag(tag: &str) -> bool {
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        return RAW_TEXT_TAGS.contains(tag.to_ascii_lowercase().as_str());
    }
    RAW_TEXT_TAGS.contains(tag)
}
