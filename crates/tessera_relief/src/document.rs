//! Arena-backed document tree.
//!
//! Every node is owned by the [`Document`]. Structural edits (clone, splice,
//! remove) only rewrite parent/child links and free slots; a freed slot is
//! never handed out again, so [`Document::is_live`] is a reliable
//! use-after-remove check for anyone holding a [`NodeId`].

use tessera_carton::{SmallVec, String};

use crate::ast::{ElementData, NodeId, NodeKind};
use crate::errors::{TreeError, TreeResult};

/// A node slot in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Parsed document tree.
///
/// Removing a node frees its slot but never shrinks the arena: ids stay
/// stable for the lifetime of the document, so a tree that is reshaped many
/// times keeps growing by the size of every subtree it cloned. Reparse (or
/// [`Document::compacted`]) to start from a dense arena.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only its root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeKind::Root))],
            root: NodeId::new(0),
        }
    }

    /// The document root
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` still refers to a node of this document
    #[inline]
    pub fn is_live(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.index()), Some(Some(_)))
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Number of arena slots, freed ones included
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Copy of the tree reachable from the root in a fresh, dense arena.
    ///
    /// Ids of `self` mean nothing in the result.
    pub fn compacted(&self) -> Document {
        let mut out = Document::new();
        let mut pending = vec![(self.root, out.root)];
        while let Some((source, target)) = pending.pop() {
            for &child in self.children(source) {
                let Some(node) = self.node(child) else {
                    continue;
                };
                let copy = out.alloc(node.kind.clone());
                if let Ok(copy_node) = out.node_mut(copy) {
                    copy_node.parent = Some(target);
                }
                if let Ok(target_node) = out.node_mut(target) {
                    target_node.children.push(copy);
                }
                pending.push((child, copy));
            }
        }
        out
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::DeadNode(id))
    }

    fn live(&self, id: NodeId) -> TreeResult<&Node> {
        self.node(id).ok_or(TreeError::DeadNode(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.kind(id).and_then(NodeKind::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> TreeResult<&mut ElementData> {
        self.node_mut(id)?
            .kind
            .as_element_mut()
            .ok_or(TreeError::NotAnElement(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id`; empty for dead nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Pre-order walk over the descendants of `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    // ========== Construction ==========

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(Node::new(kind)));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.alloc(NodeKind::Element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(content.into()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(content.into()))
    }

    // ========== Splicing ==========

    /// Check that `node` can be attached somewhere under `parent`
    fn check_attachable(&self, parent: NodeId, node: NodeId) -> TreeResult<()> {
        let target = self.live(node)?;
        self.live(parent)?;
        if node == self.root {
            return Err(TreeError::Root(node));
        }
        if target.parent.is_some() {
            return Err(TreeError::Attached(node));
        }
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == node {
                return Err(TreeError::Cycle(node));
            }
            cursor = self.parent(current);
        }
        Ok(())
    }

    /// Attach a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check_attachable(parent, child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Attach a detached node as the sibling right before `anchor`
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> TreeResult<()> {
        self.insert_at_sibling(anchor, node, 0)
    }

    /// Attach a detached node as the sibling right after `anchor`
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> TreeResult<()> {
        self.insert_at_sibling(anchor, node, 1)
    }

    fn insert_at_sibling(&mut self, anchor: NodeId, node: NodeId, offset: usize) -> TreeResult<()> {
        let parent = self
            .live(anchor)?
            .parent
            .ok_or(TreeError::Detached(anchor))?;
        self.check_attachable(parent, node)?;
        let index = self
            .index_in_parent(anchor)
            .ok_or(TreeError::Detached(anchor))?;
        self.node_mut(parent)?.children.insert(index + offset, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `id` from its parent, keeping the subtree alive
    pub fn detach(&mut self, id: NodeId) -> TreeResult<()> {
        if id == self.root {
            return Err(TreeError::Root(id));
        }
        let parent = self.live(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Unlink `id` and free its whole subtree
    pub fn remove(&mut self, id: NodeId) -> TreeResult<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Copy the subtree rooted at `id` into fresh, detached nodes
    pub fn deep_clone(&mut self, id: NodeId) -> TreeResult<NodeId> {
        if id == self.root {
            return Err(TreeError::Root(id));
        }
        let kind = self.live(id)?.kind.clone();
        let copy = self.alloc(kind);
        // (source, copy) pairs whose children still need copying
        let mut pending = vec![(id, copy)];
        while let Some((source, target)) = pending.pop() {
            let children = self.children(source).to_vec();
            for child in children {
                let kind = self.live(child)?.kind.clone();
                let child_copy = self.alloc(kind);
                self.node_mut(child_copy)?.parent = Some(target);
                self.node_mut(target)?.children.push(child_copy);
                pending.push((child, child_copy));
            }
        }
        Ok(copy)
    }

    // ========== Attributes & content ==========

    /// Attribute value of an element. Valueless attributes read as `""`.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> TreeResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> TreeResult<Option<String>> {
        Ok(self
            .element_mut(id)?
            .remove_attr(name)
            .and_then(|attr| attr.value))
    }

    /// Concatenated text of `id` and all its descendants
    pub fn text_content(&self, id: NodeId) -> std::string::String {
        let mut out = std::string::String::new();
        if let Some(NodeKind::Text(text)) = self.kind(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(NodeKind::Text(text)) = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the children of `id` with a single text node.
    ///
    /// On a text node the text itself is replaced. An empty string leaves the
    /// element without children.
    pub fn set_text_content(&mut self, id: NodeId, content: &str) -> TreeResult<()> {
        if let NodeKind::Text(text) = &mut self.node_mut(id)?.kind {
            *text = content.into();
            return Ok(());
        }
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            // Already unlinked from `id`, so only free the subtree.
            self.node_mut(child)?.parent = None;
            self.remove(child)?;
        }
        if !content.is_empty() {
            let text = self.create_text(content);
            self.append_child(id, text)?;
        }
        Ok(())
    }
}

/// Pre-order iterator returned by [`Document::descendants`]
pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Descendants<'d> {
    /// Skip the subtree of the node returned last
    pub fn skip_children(&mut self, of: NodeId) {
        let count = self.doc.children(of).len();
        let keep = self.stack.len().saturating_sub(count);
        self.stack.truncate(keep);
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let ul = doc.create_element(ElementData::new("ul"));
        doc.append_child(root, ul).unwrap();
        let a = doc.create_element(ElementData::new("li").with_attr("class", "a"));
        let b = doc.create_element(ElementData::new("li").with_attr("class", "b"));
        doc.append_child(ul, a).unwrap();
        doc.append_child(ul, b).unwrap();
        let text = doc.create_text("first");
        doc.append_child(a, text).unwrap();
        (doc, ul, a, b)
    }

    #[test]
    fn test_append_and_children() {
        let (doc, ul, a, b) = sample();
        assert_eq!(doc.children(ul), &[a, b]);
        assert_eq!(doc.parent(a), Some(ul));
        assert_eq!(doc.index_in_parent(b), Some(1));
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut doc, ul, a, b) = sample();
        let x = doc.create_element(ElementData::new("li"));
        let y = doc.create_element(ElementData::new("li"));
        doc.insert_before(b, x).unwrap();
        doc.insert_after(b, y).unwrap();
        assert_eq!(doc.children(ul), &[a, x, b, y]);
    }

    #[test]
    fn test_insert_attached_node_fails() {
        let (mut doc, _, a, b) = sample();
        assert_eq!(doc.insert_after(b, a), Err(TreeError::Attached(a)));
    }

    #[test]
    fn test_append_cycle_fails() {
        let (mut doc, ul, a, _) = sample();
        doc.detach(ul).unwrap();
        assert_eq!(doc.append_child(a, ul), Err(TreeError::Cycle(ul)));
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut doc, ul, a, b) = sample();
        let text = doc.children(a)[0];
        doc.remove(a).unwrap();
        assert!(!doc.is_live(a));
        assert!(!doc.is_live(text));
        assert_eq!(doc.children(ul), &[b]);
        assert_eq!(doc.remove(a), Err(TreeError::DeadNode(a)));
    }

    #[test]
    fn test_remove_root_fails() {
        let mut doc = Document::new();
        let root = doc.root();
        assert_eq!(doc.remove(root), Err(TreeError::Root(root)));
    }

    #[test]
    fn test_deep_clone_is_detached_copy() {
        let (mut doc, ul, a, _) = sample();
        let copy = doc.deep_clone(a).unwrap();
        assert_ne!(copy, a);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.attribute(copy, "class"), Some("a"));
        assert_eq!(doc.text_content(copy), "first");
        assert_ne!(doc.children(copy)[0], doc.children(a)[0]);
        assert_eq!(doc.children(ul).len(), 2);
    }

    #[test]
    fn test_deep_clone_of_deep_chain() {
        let mut doc = Document::new();
        let mut top = doc.create_text("leaf");
        for _ in 0..100_000 {
            let el = doc.create_element(ElementData::new("div"));
            doc.append_child(el, top).unwrap();
            top = el;
        }
        let root = doc.root();
        doc.append_child(root, top).unwrap();

        let copy = doc.deep_clone(top).unwrap();
        assert_eq!(doc.node_count(), 2 * 100_001 + 1);
        assert_eq!(doc.text_content(copy), "leaf");
        doc.remove(copy).unwrap();
        assert_eq!(doc.node_count(), 100_001 + 1);
    }

    #[test]
    fn test_deep_clone_keeps_child_order() {
        let (mut doc, ul, a, b) = sample();
        let copy = doc.deep_clone(ul).unwrap();
        let classes: Vec<_> = doc
            .children(copy)
            .iter()
            .map(|&li| doc.attribute(li, "class"))
            .collect();
        assert_eq!(classes, vec![Some("a"), Some("b")]);
        assert_eq!(doc.children(ul), &[a, b]);
    }

    #[test]
    fn test_freed_slots_are_kept_until_compacted() {
        let (mut doc, ul, a, _) = sample();
        for _ in 0..3 {
            let copy = doc.deep_clone(a).unwrap();
            doc.insert_after(a, copy).unwrap();
            doc.remove(copy).unwrap();
        }
        assert_eq!(doc.node_count(), 5);
        assert_eq!(doc.slot_count(), 11);
        assert!(doc.is_live(ul));

        let dense = doc.compacted();
        assert_eq!(dense.slot_count(), 5);
        assert_eq!(dense.node_count(), 5);
        assert_eq!(dense.to_html_string(), doc.to_html_string());
    }

    #[test]
    fn test_text_content_round_trip() {
        let (mut doc, ul, a, b) = sample();
        doc.set_text_content(b, "second").unwrap();
        assert_eq!(doc.text_content(ul), "firstsecond");

        let old = doc.children(a)[0];
        doc.set_text_content(a, "").unwrap();
        assert!(doc.children(a).is_empty());
        assert!(!doc.is_live(old));
    }

    #[test]
    fn test_descendants_preorder_and_skip() {
        let (doc, ul, a, b) = sample();
        let text = doc.children(a)[0];
        let all: Vec<_> = doc.descendants(doc.root()).collect();
        assert_eq!(all, vec![ul, a, text, b]);

        let mut walk = doc.descendants(ul);
        let mut seen = Vec::new();
        while let Some(id) = walk.next() {
            seen.push(id);
            if id == a {
                walk.skip_children(a);
            }
        }
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn test_attributes() {
        let (mut doc, ul, a, _) = sample();
        doc.set_attribute(ul, "id", "list").unwrap();
        assert_eq!(doc.attribute(ul, "id"), Some("list"));
        assert_eq!(
            doc.remove_attribute(a, "class").unwrap(),
            Some(String::from("a"))
        );
        let text = doc.children(a)[0];
        assert_eq!(
            doc.set_attribute(text, "id", "x"),
            Err(TreeError::NotAnElement(text))
        );
    }
}
