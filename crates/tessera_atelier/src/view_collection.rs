//! Ordered groups of views repeated from one scope.

use std::ops::Index;

use tessera_carton::FxHashSet;
use tessera_relief::{Document, NodeId, TreeError};

use crate::accessor::{DataSet, Datum};
use crate::errors::BindingResult;
use crate::view::{clone_many, insert_run, Placement, View};

/// Views that came from the same scope, in document order.
///
/// Operations pair members with data items by position and stop at whichever
/// side runs out first. A length mismatch is never an error.
#[derive(Debug, Clone, Default)]
pub struct ViewCollection {
    views: Vec<View>,
}

impl ViewCollection {
    pub fn new(views: Vec<View>) -> Self {
        Self { views }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    pub fn first(&self) -> Option<&View> {
        self.views.first()
    }

    pub fn last(&self) -> Option<&View> {
        self.views.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> {
        self.views.iter()
    }

    pub fn push(&mut self, view: View) {
        self.views.push(view);
    }

    pub fn into_vec(self) -> Vec<View> {
        self.views
    }

    /// Run `block` with the whole collection
    pub fn with<R>(&self, block: impl FnOnce(&ViewCollection) -> R) -> R {
        block(self)
    }

    /// Call `block` for each member paired with the item at the same position
    pub fn for_each<D, F>(&self, doc: &mut Document, data: &D, mut block: F) -> BindingResult<()>
    where
        D: DataSet + ?Sized,
        F: FnMut(&mut Document, &View, &D::Item) -> BindingResult<()>,
    {
        self.for_each_with_index(doc, data, |doc, view, datum, _| block(doc, view, datum))
    }

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
        for (index, view) in self.views.iter().enumerate() {
            let Some(datum) = data.get(index) else {
                break;
            };
            view.ensure_live(doc)?;
            block(doc, view, datum, index)?;
        }
        Ok(())
    }

    /// Grow or shrink the group to one member per item of `data`.
    ///
    /// Members nested inside another member are dropped first; they go along
    /// with their container. Surplus members are then removed from the end.
    /// Missing members are copies of the last member, inserted after it. An
    /// empty collection has nothing to copy and stays empty.
    pub fn match_data<D>(self, doc: &mut Document, data: &D) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
    {
        for view in &self.views {
            view.ensure_live(doc)?;
        }
        let mut views = outermost(doc, self.views);
        let Some(template) = views.last().cloned() else {
            return Ok(Self::default());
        };

        let count = data.len();
        if count < views.len() {
            for view in views.drain(count..) {
                doc.remove(view.node())?;
            }
        } else if count > views.len() {
            if doc.parent(template.node()).is_none() {
                return Err(TreeError::Detached(template.node()).into());
            }
            let copies = clone_many(doc, template.node(), count - views.len())?;
            insert_run(doc, template.node(), &copies, Placement::After)?;
            views.extend(copies.into_iter().map(|id| template.derive(id)));
        }

        tracing::debug!(
            scope = template.scoped_as().unwrap_or(""),
            count,
            "matched collection to data"
        );
        Ok(Self { views })
    }

    /// [`ViewCollection::match_data`], then [`ViewCollection::for_each`]
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

    /// Bind each member to the item at the same position. Members without an
    /// item keep their content.
    pub fn bind<D>(&self, doc: &mut Document, data: &D) -> BindingResult<()>
    where
        D: DataSet + ?Sized,
        D::Item: Datum,
    {
        self.for_each(doc, data, |doc, view, datum| view.bind(doc, datum))
    }

    /// Bind each member, then call `block` with it
    pub(crate) fn bind_then<D, F>(
        &self,
        doc: &mut Document,
        data: &D,
        mut block: F,
    ) -> BindingResult<()>
    where
        D: DataSet + ?Sized,
        D::Item: Datum,
        F: FnMut(&mut Document, &View, &D::Item) -> BindingResult<()>,
    {
        self.for_each(doc, data, |doc, view, datum| {
            view.bind(doc, datum)?;
            block(doc, view, datum)
        })
    }

    /// [`ViewCollection::match_data`], then [`ViewCollection::bind`]
    pub fn apply<D>(self, doc: &mut Document, data: &D) -> BindingResult<ViewCollection>
    where
        D: DataSet + ?Sized,
        D::Item: Datum,
    {
        let views = self.match_data(doc, data)?;
        views.bind(doc, data)?;
        Ok(views)
    }

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

    /// Scope `name` under every member, in member order
    pub fn scope(&self, doc: &Document, name: &str) -> ViewCollection {
        self.views
            .iter()
            .flat_map(|view| view.scope(doc, name))
            .collect()
    }

    /// Prop `name` of every member, in member order
    pub fn prop(&self, doc: &Document, name: &str) -> ViewCollection {
        self.views
            .iter()
            .flat_map(|view| view.prop(doc, name))
            .collect()
    }

    /// Remove every member from the document
    pub fn remove(self, doc: &mut Document) -> BindingResult<()> {
        for view in &self.views {
            view.ensure_live(doc)?;
        }
        for view in outermost(doc, self.views) {
            view.remove(doc)?;
        }
        Ok(())
    }
}

/// `views` without the members that sit inside another member
fn outermost(doc: &Document, views: Vec<View>) -> Vec<View> {
    let members: FxHashSet<NodeId> = views.iter().map(View::node).collect();
    views
        .into_iter()
        .filter(|view| !has_ancestor_in(doc, view.node(), &members))
        .collect()
}

fn has_ancestor_in(doc: &Document, node: NodeId, members: &FxHashSet<NodeId>) -> bool {
    let mut cursor = doc.parent(node);
    while let Some(id) = cursor {
        if members.contains(&id) {
            return true;
        }
        cursor = doc.parent(id);
    }
    false
}

impl From<Vec<View>> for ViewCollection {
    fn from(views: Vec<View>) -> Self {
        Self::new(views)
    }
}

impl FromIterator<View> for ViewCollection {
    fn from_iter<I: IntoIterator<Item = View>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ViewCollection {
    type Item = View;
    type IntoIter = std::vec::IntoIter<View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViewCollection {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

impl Index<usize> for ViewCollection {
    type Output = View;

    fn index(&self, index: usize) -> &View {
        &self.views[index]
    }
}
