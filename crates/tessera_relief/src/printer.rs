//! HTML printer.
//!
//! Serializes a subtree back to markup. Text and attribute values are escaped,
//! raw-text elements (`<script>`, `<style>`, ...) are written verbatim, and
//! void elements get no end tag.

use tessera_carton::{escape_attribute, escape_text, is_raw_text_tag, is_void_tag};

use crate::ast::{NodeId, NodeKind};
use crate::document::Document;

impl Document {
    /// Serialize the node `id` (and its subtree) as HTML
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, false);
        out
    }

    /// Serialize the whole document
    pub fn to_html_string(&self) -> String {
        self.to_html(self.root())
    }

    /// Serialize only the children of `id`
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .element(id)
            .is_some_and(|el| is_raw_text_tag(&el.tag));
        for &child in self.children(id) {
            self.write_node(&mut out, child, raw);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, raw: bool) {
        let Some(kind) = self.kind(id) else {
            return;
        };
        match kind {
            NodeKind::Root => {
                for &child in self.children(id) {
                    self.write_node(out, child, false);
                }
            }
            NodeKind::Text(text) => {
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        out.push_str("=\"");
                        out.push_str(&escape_attribute(value));
                        out.push('"');
                    }
                }

                let children = self.children(id);
                if is_void_tag(&el.tag) {
                    out.push('>');
                    return;
                }
                if el.is_self_closing && children.is_empty() {
                    out.push_str(" />");
                    return;
                }
                out.push('>');

                let raw = is_raw_text_tag(&el.tag);
                for &child in children {
                    self.write_node(out, child, raw);
                }

                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Attribute, ElementData};
    use crate::document::Document;

    #[test]
    fn test_print_nested_elements() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element(ElementData::new("div").with_attr("data-scope", "post"));
        doc.append_child(root, div).unwrap();
        let span = doc.create_element(ElementData::new("span"));
        doc.append_child(div, span).unwrap();
        let text = doc.create_text("a < b");
        doc.append_child(span, text).unwrap();

        assert_eq!(
            doc.to_html_string(),
            r#"<div data-scope="post"><span>a &lt; b</span></div>"#
        );
        assert_eq!(doc.inner_html(div), "<span>a &lt; b</span>");
    }

    #[test]
    fn test_print_void_and_boolean_attrs() {
        let mut doc = Document::new();
        let root = doc.root();
        let mut input = ElementData::new("input");
        input.attrs.push(Attribute::new("disabled", None));
        let input = doc.create_element(input);
        doc.append_child(root, input).unwrap();
        let comment = doc.create_comment(" note ");
        doc.append_child(root, comment).unwrap();

        assert_eq!(doc.to_html_string(), "<input disabled><!-- note -->");
    }

    #[test]
    fn test_print_raw_text_verbatim() {
        let mut doc = Document::new();
        let root = doc.root();
        let script = doc.create_element(ElementData::new("script"));
        doc.append_child(root, script).unwrap();
        let code = doc.create_text("if (a < b) {}");
        doc.append_child(script, code).unwrap();

        assert_eq!(doc.to_html_string(), "<script>if (a < b) {}</script>");
    }
}
