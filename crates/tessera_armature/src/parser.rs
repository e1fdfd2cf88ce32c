//! Template parser.
//!
//! [`Parser`] is the tokenizer's listener: every reported section turns into
//! a node of the [`Document`] being built, and unbalanced markup is recovered
//! from with a [`ParseError`] instead of failing.

use tessera_carton::{decode_entities, String};
use tessera_relief::{
    Attribute, Document, ElementData, ErrorCode, NodeId, NodeKind, ParseError, ParserOptions,
    Position, SourceLocation, WhitespaceStrategy,
};

use crate::tokenizer::{Callbacks, QuoteType, Tokenizer};

/// Builds a [`Document`] from template source
pub struct Parser<'a> {
    source: &'a str,
    options: ParserOptions,
    doc: Document,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
    /// Open tag whose attributes are still being read
    pending_element: Option<PendingElement>,
    pending_attr: Option<PendingAttribute>,
    errors: Vec<ParseError>,
    /// Byte offsets of every `\n`, for line/column lookup
    line_breaks: Vec<usize>,
}

struct PendingElement {
    tag: String,
    /// Offset of the first byte of the tag name
    name_start: usize,
    is_self_closing: bool,
    attrs: Vec<Attribute>,
}

struct PendingAttribute {
    name: String,
    /// Byte range of the value, if one was written
    value: Option<(usize, usize)>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: &'a str, options: ParserOptions) -> Self {
        let line_breaks = source
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect();
        Self {
            source,
            options,
            doc: Document::new(),
            stack: Vec::new(),
            pending_element: None,
            pending_attr: None,
            errors: Vec::new(),
            line_breaks,
        }
    }

    /// Run the tokenizer over the source and return the finished tree
    pub fn parse(self) -> (Document, Vec<ParseError>) {
        let source = self.source;
        let is_raw_text_tag = self.options.is_raw_text_tag;
        let mut tokenizer = Tokenizer::with_raw_text_tags(source, self, is_raw_text_tag);
        tokenizer.tokenize();
        let mut parser = tokenizer.into_callbacks();

        if parser.options.whitespace == WhitespaceStrategy::Condense {
            let root = parser.doc.root();
            condense_whitespace(&mut parser.doc, root, is_raw_text_tag);
        }

        (parser.doc, parser.errors)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn position(&self, offset: usize) -> Position {
        let breaks_before = self.line_breaks.partition_point(|&nl| nl < offset);
        let line_start = match breaks_before {
            0 => 0,
            n => self.line_breaks[n - 1] + 1,
        };
        Position::new(
            offset as u32,
            breaks_before as u32 + 1,
            (offset - line_start) as u32 + 1,
        )
    }

    /// Location of `start..end`, clamped to the source
    fn span(&self, start: usize, end: usize) -> SourceLocation {
        let end = end.min(self.source.len());
        let start = start.min(end);
        SourceLocation::new(
            self.position(start),
            self.position(end),
            self.slice(start, end),
        )
    }

    /// Innermost open element, or the root
    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn add_child(&mut self, child: NodeId) {
        let parent = self.current_parent();
        // Fresh nodes are detached and live, so appending cannot fail
        let _ = self.doc.append_child(parent, child);
    }

    fn report_unclosed(&mut self, id: NodeId) {
        let loc = self.doc.element(id).map(|el| el.loc.clone());
        self.errors
            .push(ParseError::new(ErrorCode::MissingEndTag, loc));
    }
}

impl Callbacks for Parser<'_> {
    fn on_text(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }

        let raw = self.slice(start, end);
        let in_raw_text = self
            .stack
            .last()
            .and_then(|&id| self.doc.element(id))
            .is_some_and(|el| (self.options.is_raw_text_tag)(&el.tag));
        let content = if in_raw_text {
            raw.into()
        } else {
            decode_entities(raw)
        };

        // Adjacent sections (e.g. text split by a stray `<`) merge into one node
        let parent = self.current_parent();
        if let Some(&last) = self.doc.children(parent).last() {
            if let Some(NodeKind::Text(existing)) = self.doc.kind(last) {
                let merged = format!("{}{}", existing, content);
                let _ = self.doc.set_text_content(last, &merged);
                return;
            }
        }

        let text = self.doc.create_text(&*content);
        self.add_child(text);
    }

    fn on_open_tag_name(&mut self, start: usize, end: usize) {
        self.pending_element = Some(PendingElement {
            tag: self.slice(start, end).into(),
            name_start: start,
            is_self_closing: false,
            attrs: Vec::new(),
        });
    }

    fn on_open_tag_end(&mut self, end: usize) {
        let Some(pending) = self.pending_element.take() else {
            return;
        };
        // From `<` through `>`
        let loc = self.span(pending.name_start - 1, end + 1);

        let is_void = (self.options.is_void_tag)(&pending.tag);
        let keep_open = !pending.is_self_closing && !is_void;
        let id = self.doc.create_element(ElementData {
            tag: pending.tag,
            attrs: pending.attrs,
            is_self_closing: pending.is_self_closing,
            loc,
        });
        self.add_child(id);

        if keep_open {
            self.stack.push(id);
        }
    }

    fn on_self_closing_tag(&mut self, end: usize) {
        if let Some(pending) = self.pending_element.as_mut() {
            pending.is_self_closing = true;
        }
        self.on_open_tag_end(end);
    }

    fn on_close_tag(&mut self, start: usize, end: usize) {
        let tag = self.slice(start, end);
        let open = self.stack.iter().rposition(|&id| {
            self.doc
                .element(id)
                .is_some_and(|el| el.tag.eq_ignore_ascii_case(tag))
        });

        match open {
            Some(i) => {
                // Everything opened after the match is implicitly closed
                let unclosed: Vec<NodeId> = self.stack.drain(i..).skip(1).collect();
                for id in unclosed {
                    self.report_unclosed(id);
                }
            }
            // `</br>` and friends close nothing
            None if (self.options.is_void_tag)(tag) => {}
            None => {
                // From `</` through `>`
                let loc = self.span(start.saturating_sub(2), end + 1);
                self.errors
                    .push(ParseError::new(ErrorCode::InvalidEndTag, Some(loc)));
            }
        }
    }

    fn on_attrib_name(&mut self, start: usize, end: usize) {
        self.pending_attr = Some(PendingAttribute {
            name: self.slice(start, end).into(),
            value: None,
        });
    }

    fn on_attrib_data(&mut self, start: usize, end: usize) {
        if let Some(attr) = self.pending_attr.as_mut() {
            let from = attr.value.map_or(start, |(from, _)| from);
            attr.value = Some((from, end));
        }
    }

    fn on_attrib_end(&mut self, quote: QuoteType, _end: usize) {
        let Some(attr) = self.pending_attr.take() else {
            return;
        };

        let value = match attr.value {
            Some((from, to)) => Some(String::new(decode_entities(self.slice(from, to)))),
            // alt="" or alt='' is an empty value, not a boolean attribute
            None if matches!(quote, QuoteType::Double | QuoteType::Single) => {
                Some(String::default())
            }
            None => None,
        };

        let Some(pending) = self.pending_element.as_mut() else {
            return;
        };
        // First occurrence wins, as in browsers
        let duplicate = pending
            .attrs
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(&attr.name));
        if !duplicate {
            pending.attrs.push(Attribute::new(attr.name, value));
        }
    }

    fn on_comment(&mut self, start: usize, end: usize) {
        if self.options.comments {
            let comment = self.doc.create_comment(self.slice(start, end));
            self.add_child(comment);
        }
    }

    fn on_processing_instruction(&mut self, _start: usize, _end: usize) {}

    fn on_end(&mut self) {
        while let Some(id) = self.stack.pop() {
            self.report_unclosed(id);
        }
    }

    fn on_error(&mut self, code: ErrorCode, index: usize) {
        let loc = self.span(index, index + 1);
        self.errors.push(ParseError::new(code, Some(loc)));
    }
}

/// Drop indentation between elements and shrink other whitespace-only
/// text to one space. Raw-text elements are left alone.
fn condense_whitespace(doc: &mut Document, parent: NodeId, is_raw_text_tag: fn(&str) -> bool) {
    let children = doc.children(parent).to_vec();
    for &child in &children {
        let blank = match doc.kind(child) {
            Some(NodeKind::Text(text)) if text.chars().all(char::is_whitespace) => {
                Some(text.contains('\n'))
            }
            _ => None,
        };
        match blank {
            Some(true) => {
                let _ = doc.remove(child);
            }
            Some(false) => {
                let _ = doc.set_text_content(child, " ");
            }
            None => {}
        }

        if doc
            .element(child)
            .is_some_and(|el| !is_raw_text_tag(&el.tag))
        {
            condense_whitespace(doc, child, is_raw_text_tag);
        }
    }
}

/// Parse a template
pub fn parse(source: &str) -> (Document, Vec<ParseError>) {
    Parser::new(source).parse()
}

/// Parse a template with options
pub fn parse_with_options(source: &str, options: ParserOptions) -> (Document, Vec<ParseError>) {
    Parser::with_options(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(doc: &Document) -> NodeId {
        doc.descendants(doc.root())
            .find(|&id| doc.element(id).is_some())
            .expect("Expected element node")
    }

    #[test]
    fn test_parse_simple_element() {
        let (doc, errors) = parse("<div></div>");

        assert!(errors.is_empty());
        assert_eq!(doc.children(doc.root()).len(), 1);
        let el = doc.element(first_element(&doc)).unwrap();
        assert_eq!(el.tag.as_str(), "div");
        assert!(!el.is_self_closing);
    }

    #[test]
    fn test_parse_text() {
        let (doc, errors) = parse("hello");

        assert!(errors.is_empty());
        assert_eq!(doc.text_content(doc.root()), "hello");
    }

    #[test]
    fn test_parse_attributes() {
        let (doc, errors) = parse(r#"<a data-prop="email" href='/x' hidden title="">x</a>"#);

        assert!(errors.is_empty());
        let el = doc.element(first_element(&doc)).unwrap();
        assert_eq!(el.attr("data-prop"), Some("email"));
        assert_eq!(el.attr("href"), Some("/x"));
        assert_eq!(el.attrs[2].value, None);
        assert_eq!(el.attrs[3].value.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_entities() {
        let (doc, _) = parse(r#"<p title="a &amp; b">Tom &amp; Jerry</p>"#);

        let p = first_element(&doc);
        assert_eq!(doc.attribute(p, "title"), Some("a & b"));
        assert_eq!(doc.text_content(p), "Tom & Jerry");
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let (doc, errors) = parse("<p><br><img src=x /><span/>after</p>");

        assert!(errors.is_empty());
        let p = first_element(&doc);
        assert_eq!(doc.children(p).len(), 4);
        assert_eq!(doc.text_content(p), "after");
    }

    #[test]
    fn test_parse_nested_position() {
        let (doc, _) = parse("<ul>\n  <li>x</li>\n</ul>");
        let li = doc
            .descendants(doc.root())
            .find(|&id| doc.element(id).is_some_and(|el| el.tag == "li"))
            .unwrap();
        let loc = &doc.element(li).unwrap().loc;
        assert_eq!(loc.start.line, 2);
        assert_eq!(loc.start.column, 3);
        assert_eq!(loc.source.as_str(), "<li>");
    }

    #[test]
    fn test_missing_end_tag() {
        let (doc, errors) = parse("<div><span>x</div>");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::MissingEndTag);
        assert_eq!(doc.to_html_string(), "<div><span>x</span></div>");
    }

    #[test]
    fn test_invalid_end_tag() {
        let (_, errors) = parse("<div></p></div>");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidEndTag);
    }

    #[test]
    fn test_unclosed_at_eof() {
        let (doc, errors) = parse("<section><p>x");

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == ErrorCode::MissingEndTag));
        assert_eq!(doc.to_html_string(), "<section><p>x</p></section>");
    }

    #[test]
    fn test_comments_option() {
        let options = ParserOptions {
            comments: false,
            ..ParserOptions::default()
        };
        let (doc, _) = parse_with_options("<!-- hi --><b>x</b>", options);
        assert_eq!(doc.to_html_string(), "<b>x</b>");
    }

    #[test]
    fn test_condense_whitespace() {
        let options = ParserOptions {
            whitespace: WhitespaceStrategy::Condense,
            ..ParserOptions::default()
        };
        let (doc, _) = parse_with_options("<ul>\n  <li>a</li> <li>b</li>\n</ul>", options);
        assert_eq!(doc.to_html_string(), "<ul><li>a</li> <li>b</li></ul>");
    }

    #[test]
    fn test_preserve_whitespace_by_default() {
        let source = "<ul>\n  <li>a</li>\n</ul>";
        let (doc, _) = parse(source);
        assert_eq!(doc.to_html_string(), source);
    }
}
