//! Scope and prop discovery.
//!
//! Walks a subtree looking for marker attributes. Scopes are found at any
//! depth, including inside other scopes of the same name. Props belong to the
//! nearest enclosing scope, so the prop walk never enters a nested scope. Nor
//! does it enter a prop: binding replaces the prop's content, so anything
//! marked inside it is not bindable.

use tessera_relief::{Document, NodeId};

use crate::options::BindingOptions;

/// Scope name declared on `id`, if any
pub fn scope_name<'d>(
    doc: &'d Document,
    id: NodeId,
    options: &BindingOptions,
) -> Option<&'d str> {
    doc.attribute(id, &options.scope_attribute)
}

/// Prop name declared on `id`, if any
pub fn prop_name<'d>(
    doc: &'d Document,
    id: NodeId,
    options: &BindingOptions,
) -> Option<&'d str> {
    doc.attribute(id, &options.prop_attribute)
}

/// Nodes under `from` (excluding `from`) that declare scope `name`, in
/// document order.
///
/// A scope with a different name hides everything inside it.
pub fn find_scopes(
    doc: &Document,
    from: NodeId,
    name: &str,
    options: &BindingOptions,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut walk = doc.descendants(from);
    while let Some(id) = walk.next() {
        match scope_name(doc, id, options) {
            Some(scope) if scope == name => found.push(id),
            Some(_) => walk.skip_children(id),
            None => {}
        }
    }
    found
}

/// Outermost scope nodes under `from`, whatever their name
pub fn scope_roots(doc: &Document, from: NodeId, options: &BindingOptions) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut walk = doc.descendants(from);
    while let Some(id) = walk.next() {
        if scope_name(doc, id, options).is_some() {
            found.push(id);
            walk.skip_children(id);
        }
    }
    found
}

/// Nodes under `from` (excluding `from`) that declare prop `name` and are not
/// inside a nested scope or another prop.
pub fn find_props(
    doc: &Document,
    from: NodeId,
    name: &str,
    options: &BindingOptions,
) -> Vec<NodeId> {
    bound_props(doc, from, options)
        .into_iter()
        .filter_map(|(id, prop)| (prop == name).then_some(id))
        .collect()
}

/// Distinct prop names bound directly under `from`, in first-seen order
pub fn collect_bindings(doc: &Document, from: NodeId, options: &BindingOptions) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (_, prop) in bound_props(doc, from, options) {
        if !names.contains(&prop) {
            names.push(prop);
        }
    }
    names
}

/// Every prop node that belongs to `from`, paired with its prop name
pub(crate) fn bound_props(
    doc: &Document,
    from: NodeId,
    options: &BindingOptions,
) -> Vec<(NodeId, String)> {
    let mut props = Vec::new();
    let mut walk = doc.descendants(from);
    while let Some(id) = walk.next() {
        if scope_name(doc, id, options).is_some() {
            walk.skip_children(id);
            continue;
        }
        if let Some(prop) = prop_name(doc, id, options) {
            props.push((id, prop.to_string()));
            walk.skip_children(id);
        }
    }
    props
}
