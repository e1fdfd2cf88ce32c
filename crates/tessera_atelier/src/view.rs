//! A single templated region of a document.

use std::rc::Rc;

use tessera_carton::String;
use tessera_relief::{Document, NodeId, TreeError};

use crate::accessor::{fetch, DataSet, Datum};
use crate::discovery::{
    bound_props, collect_bindings, find_props, find_scopes, prop_name, scope_name,
};
use crate::errors::{BindingError, BindingResult};
use crate::handle::Handle;
use crate::options::BindingOptions;
use crate::view_collection::ViewCollection;

/// Handle over one document node plus the scope/prop metadata found under it.
///
/// A view does not borrow the document; every operation takes it explicitly.
/// Once the view's node is removed (by [`View::remove`], [`View::match_data`]
/// or any other edit), operations on the view fail with
/// [`BindingError::InvalidViewState`].
#[derive(Debug, Clone)]
pub struct View {
    node: NodeId,
    scoped_as: Option<String>,
    bindings: Vec<std::string::String>,
    context: Option<Handle>,
    composer: Option<Handle>,
    options: Rc<BindingOptions>,
}

impl View {
    /// Wrap `node`, reading its scope name and collecting its bindings
    pub fn new(doc: &Document, node: NodeId, options: Rc<BindingOptions>) -> Self {
        Self {
            node,
            scoped_as: scope_name(doc, node, &options).map(String::from),
            bindings: collect_bindings(doc, node, &options),
            context: None,
            composer: None,
            options,
        }
    }

    /// View over the document root with the default attribute names
    pub fn from_doc(doc: &Document) -> Self {
        Self::from_doc_with_options(doc, BindingOptions::default())
    }

    pub fn from_doc_with_options(doc: &Document, options: BindingOptions) -> Self {
        Self::new(doc, doc.root(), Rc::new(options))
    }

    /// Attach a caller-supplied execution context
    pub fn with_context(mut self, context: Handle) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach the owning composer
    pub fn with_composer(mut self, composer: Handle) -> Self {
        self.composer = Some(composer);
        self
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Scope name when this view wraps a scope container
    pub fn scoped_as(&self) -> Option<&str> {
        self.scoped_as.as_deref()
    }

    /// Prop names bound directly by this view, in document order
    pub fn bindings(&self) -> &[std::string::String] {
        &self.bindings
    }

    /// The execution context; `None` means the view itself
    pub fn context(&self) -> Option<&Handle> {
        self.context.as_ref()
    }

    pub fn composer(&self) -> Option<&Handle> {
        self.composer.as_ref()
    }

    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    /// Whether the wrapped node is still part of `doc`
    pub fn is_live(&self, doc: &Document) -> bool {
        doc.is_live(self.node)
    }

    pub(crate) fn ensure_live(&self, doc: &Document) -> BindingResult<()> {
        if self.is_live(doc) {
            Ok(())
        } else {
            Err(BindingError::removed(self.node))
        }
    }

    /// Recompute `bindings` after the subtree was edited by hand
    pub fn refresh_bindings(&mut self, doc: &Document) -> BindingResult<()> {
        self.ensure_live(doc)?;
        self.bindings = collect_bindings(doc, self.node, &self.options);
        Ok(())
    }

    /// Same metadata, different node
    pub(crate) fn derive(&self, node: NodeId) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }

    /// Child view over `node`, inheriting context, composer and options
    fn child(&self, doc: &Document, node: NodeId) -> Self {
        Self {
            context: self.context.clone(),
            composer: self.composer.clone(),
            ..Self::new(doc, node, Rc::clone(&self.options))
        }
    }

    /// Every scope `name` under this view. Missing scopes give an empty
    /// collection.
    pub fn scope(&self, doc: &Document, name: &str) -> ViewCollection {
        find_scopes(doc, self.node, name, &self.options)
            .into_iter()
            .map(|id| self.child(doc, id))
            .collect()
    }

    /// Every prop `name` that belongs to this view
    pub fn prop(&self, doc: &Document, name: &str) -> ViewCollection {
        find_props(doc, self.node, name, &self.options)
            .into_iter()
            .map(|id| self.child(doc, id))
            .collect()
    }

    /// Run `block` with this view
    pub fn with<R>(&self, block: impl FnOnce(&View) -> R) -> R {
        block(self)
    }

    /// Call `block` with this view and the first item of `data`.
    ///
    /// A single view takes at most one item; an empty data set skips the
    /// block.
    pub fn for_each<D, F>(&self, doc: &mut Document, data: &D, mut block: F) -> BindingResult<()>
    where
        D: DataSet + ?Sized,
        F: FnMut(&mut Document, &View, &D::Item) -> BindingResult<()>,
    {
        self.ensure_live(doc)?;
        match data.get(0) {
            Some(datum) => block(doc, self, datum),
            None => Ok(()),
        }
    }

    /// Like [`View::for_each`], also passing the index (always 0)
    pub fn for_each_with_index<D, F>(
        &self,
        doc: &mut Document,
        data: &D,
        mut block: F,
    ) -> BindingResult<()>
    where
        D: DataSet + ?Sized,
        F: FnMut(&mut Document, &View, &D::Item, usize) -> BindingResult<()>,
    {
        self.for_each(doc, data, |doc, view, datum| block(doc, view, datum, 0))
    }

    /// Replace this view's node with one copy per item of `data`.
    ///
    /// The copies take the node's place in document order and the node itself
    /// is removed, so an empty data set removes the scope entirely. The view
    /// is consumed; use the returned collection.
    pub fn match_data<D>(self, doc: &mut Document, data: &D) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
    {
        self.ensure_live(doc)?;
        if doc.parent(self.node).is_none() {
            return Err(TreeError::Detached(self.node).into());
        }

        let count = data.len();
        let copies = clone_many(doc, self.node, count)?;
        insert_run(doc, self.node, &copies, Placement::Before)?;
        doc.remove(self.node)?;

        tracing::debug!(
            node = %self.node,
            scope = self.scoped_as.as_deref().unwrap_or(""),
            count,
            "matched view to data"
        );

        Ok(copies.into_iter().map(|id| self.derive(id)).collect())
    }

    /// [`View::match_data`], then [`ViewCollection::for_each`]
    pub fn repeat<D, F>(
        self,
        doc: &mut Document,
        data: &D,
        block: F,
    ) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
        F: FnMut(&mut Document, &View, &D::Item) -> BindingResult<()>,
    {
        let views = self.match_data(doc, data)?;
        views.for_each(doc, data, block)?;
        Ok(views)
    }

    /// [`View::match_data`], then [`ViewCollection::for_each_with_index`]
    pub fn repeat_with_index<D, F>(
        self,
        doc: &mut Document,
        data: &D,
        block: F,
    ) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
        F: FnMut(&mut Document, &View, &D::Item, usize) -> BindingResult<()>,
    {
        let views = self.match_data(doc, data)?;
        views.for_each_with_index(doc, data, block)?;
        Ok(views)
    }

    /// Write values from `datum` into this view's prop nodes.
    ///
    /// A bare prop view writes its own text. Otherwise every binding is
    /// resolved first, so a missing key leaves the tree untouched.
    pub fn bind<T>(&self, doc: &mut Document, datum: &T) -> BindingResult<()>
    where
        T: Datum + ?Sized,
    {
        self.ensure_live(doc)?;

        if self.scoped_as.is_none() {
            if let Some(prop) = prop_name(doc, self.node, &self.options) {
                let value = fetch(datum, prop)?;
                tracing::trace!(node = %self.node, value = %value, "bound prop");
                doc.set_text_content(self.node, &value)?;
                return Ok(());
            }
        }

        let mut values = Vec::with_capacity(self.bindings.len());
        for key in &self.bindings {
            values.push((key.as_str(), fetch(datum, key)?));
        }

        for (node, prop) in bound_props(doc, self.node, &self.options) {
            if let Some((_, value)) = values.iter().find(|(key, _)| *key == prop) {
                tracing::trace!(node = %node, prop = %prop, "bound prop");
                doc.set_text_content(node, value)?;
            }
        }
        Ok(())
    }

    /// [`View::match_data`], then bind each copy to its datum
    pub fn apply<D>(self, doc: &mut Document, data: &D) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
        D::Item: Datum,
    {
        let views = self.match_data(doc, data)?;
        views.bind(doc, data)?;
        Ok(views)
    }

    /// Like [`View::apply`], calling `block` after each copy is bound
    pub fn apply_with<D, F>(
        self,
        doc: &mut Document,
        data: &D,
        block: F,
    ) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
        D::Item: Datum,
        F: FnMut(&mut Document, &View, &D::Item) -> BindingResult<()>,
    {
        let views = self.match_data(doc, data)?;
        views.bind_then(doc, data, block)?;
        Ok(views)
    }

    /// Remove the node and its subtree from the document
    pub fn remove(self, doc: &mut Document) -> BindingResult<()> {
        self.ensure_live(doc)?;
        doc.remove(self.node)?;
        Ok(())
    }

    /// Text content of the wrapped node
    pub fn text(&self, doc: &Document) -> std::string::String {
        doc.text_content(self.node)
    }

    /// HTML of the wrapped node
    pub fn to_html(&self, doc: &Document) -> std::string::String {
        doc.to_html(self.node)
    }
}

/// Where a run of copies goes relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Before,
    After,
}

/// Deep-clone `template` `count` times. On failure no copy is left behind.
pub(crate) fn clone_many(
    doc: &mut Document,
    template: NodeId,
    count: usize,
) -> BindingResult<Vec<NodeId>> {
    let mut copies = Vec::with_capacity(count);
    for _ in 0..count {
        match doc.deep_clone(template) {
            Ok(copy) => copies.push(copy),
            Err(err) => {
                for copy in copies {
                    let _ = doc.remove(copy);
                }
                return Err(err.into());
            }
        }
    }
    Ok(copies)
}

/// Splice detached `copies` next to `anchor`, keeping their order
pub(crate) fn insert_run(
    doc: &mut Document,
    anchor: NodeId,
    copies: &[NodeId],
    placement: Placement,
) -> BindingResult<()> {
    let Some((&first, rest)) = copies.split_first() else {
        return Ok(());
    };
    match placement {
        Placement::Before => doc.insert_before(anchor, first)?,
        Placement::After => doc.insert_after(anchor, first)?,
    }
    let mut previous = first;
    for &copy in rest {
        doc.insert_after(previous, copy)?;
        previous = copy;
    }
    Ok(())
}
