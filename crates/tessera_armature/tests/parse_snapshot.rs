//! Parser snapshot tests.
//!
//! These tests parse templates and compare the re-serialized document (and
//! the recovered errors) against expected snapshots.

use tessera_armature::{parse, parse_with_options};
use tessera_relief::{ParserOptions, WhitespaceStrategy};

/// Parse and print, failing on any parse error
fn round_trip(src: &str) -> String {
    let (doc, errors) = parse(src);
    if !errors.is_empty() {
        panic!("Parse errors: {:?}", errors);
    }
    doc.to_html_string()
}

/// Parse and describe the recovered errors
fn error_report(src: &str) -> String {
    let (doc, errors) = parse(src);
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("{} | {}", doc.to_html_string(), messages.join("; "))
}

// =============================================================================
// Elements
// =============================================================================

mod elements {
    use super::*;

    #[test]
    fn nested_scope_template() {
        insta::assert_snapshot!(
            round_trip(r#"<div data-scope="contact"><span data-prop="full_name">John</span></div>"#),
            @r#"<div data-scope="contact"><span data-prop="full_name">John</span></div>"#
        );
    }

    #[test]
    fn void_elements() {
        insta::assert_snapshot!(
            round_trip(r#"<p>a<br>b<img src="x.png"></p>"#),
            @r#"<p>a<br>b<img src="x.png"></p>"#
        );
    }

    #[test]
    fn self_closing_element() {
        insta::assert_snapshot!(round_trip("<x-icon name=star />"), @r#"<x-icon name="star" />"#);
    }

    #[test]
    fn boolean_and_empty_attributes() {
        insta::assert_snapshot!(
            round_trip(r#"<input disabled value="">"#),
            @r#"<input disabled value="">"#
        );
    }
}

// =============================================================================
// Text
// =============================================================================

mod text {
    use super::*;

    #[test]
    fn entities_are_decoded_and_reescaped() {
        let (doc, _) = parse("<p>Fish &amp; Chips &lt;3</p>");
        assert_eq!(doc.text_content(doc.root()), "Fish & Chips <3");
        insta::assert_snapshot!(doc.to_html_string(), @"<p>Fish &amp; Chips &lt;3</p>");
    }

    #[test]
    fn raw_text_is_verbatim() {
        insta::assert_snapshot!(
            round_trip("<style>a > b { color: red }</style>"),
            @"<style>a > b { color: red }</style>"
        );
    }

    #[test]
    fn comments_survive() {
        insta::assert_snapshot!(round_trip("<!-- header --><h1>T</h1>"), @"<!-- header --><h1>T</h1>");
    }

    #[test]
    fn condensed_whitespace() {
        let options = ParserOptions {
            whitespace: WhitespaceStrategy::Condense,
            ..ParserOptions::default()
        };
        let (doc, _) = parse_with_options(
            "<ul>\n  <li data-scope=\"item\">a</li>\n  <li data-scope=\"item\">b</li>\n</ul>",
            options,
        );
        insta::assert_snapshot!(
            doc.to_html_string(),
            @r#"<ul><li data-scope="item">a</li><li data-scope="item">b</li></ul>"#
        );
    }
}

// =============================================================================
// Recovery
// =============================================================================

mod recovery {
    use super::*;

    #[test]
    fn missing_end_tag() {
        insta::assert_snapshot!(
            error_report("<div><span>x</div>"),
            @"<div><span>x</span></div> | Element is missing end tag. (1:6)"
        );
    }

    #[test]
    fn stray_end_tag() {
        insta::assert_snapshot!(
            error_report("<p>x</b></p>"),
            @"<p>x</p> | Invalid end tag. (1:5)"
        );
    }
}
