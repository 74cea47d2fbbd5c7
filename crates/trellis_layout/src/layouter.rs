//! Layout protocol
//!
//! Geometry is computed in two top-down passes over the layouter tree:
//!
//! 1. **Measure** - [`Layouter::layout`] receives [`Constraints`] and
//!    returns the node's size. Parents derive constraints for each child,
//!    lay the child out, and check the returned size with
//!    [`LayoutCx::check_overflow`].
//! 2. **Position** - once the whole tree is measured,
//!    [`Layouter::position_at`] fixes the node's absolute position. Parents
//!    position children at offsets they computed while measuring.
//!
//! The engine records each node's constraints, size and position, which is
//! what lets [`ElementTree`] replay a child-independent subtree after a
//! local state update.

use smallvec::SmallVec;
use trellis_core::{Constraints, Point, Size};
use trellis_platform::{NativeBackend, NativeHandle};

use crate::error::{OverflowError, Result, WidgetDescriptor};
use crate::tree::{ElementTree, LayouterId};
use crate::widget::{Widget, WidgetRef};

/// Geometry behavior attached to an element
pub trait Layouter {
    /// Compute this node's size under `constraints`.
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size>;

    /// Fix this node's absolute position and position its children.
    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()>;

    /// Whether this node's size depends only on its incoming constraints.
    ///
    /// Such a node can be laid out again with its cached constraints when
    /// something below it changes, without involving its ancestors.
    fn sizing_independent_of_children(&self, widget: &dyn Widget) -> bool {
        let _ = widget;
        false
    }
}

/// Report an overflow when `size` lies outside `constraints` on either axis
pub fn check_overflow(widget: &dyn Widget, size: Size, constraints: Constraints) -> Result<()> {
    if constraints.contains(size) {
        return Ok(());
    }
    Err(OverflowError {
        widget: WidgetDescriptor::of(widget),
        size,
        constraints,
    }
    .into())
}

/// Access to the tree for the layouter currently running
pub struct LayoutCx<'a> {
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) id: LayouterId,
}

impl<'a> LayoutCx<'a> {
    pub(crate) fn new(tree: &'a mut ElementTree, id: LayouterId) -> Self {
        Self { tree, id }
    }

    /// The layouter being run
    pub fn id(&self) -> LayouterId {
        self.id
    }

    /// Child layouters, in element order
    pub fn children(&self) -> SmallVec<[LayouterId; 4]> {
        self.tree.layouters[self.id].children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.tree.layouters[self.id].children.len()
    }

    /// The `n`th child layouter. Panics when out of range.
    pub fn child(&self, n: usize) -> LayouterId {
        let children = &self.tree.layouters[self.id].children;
        match children.get(n) {
            Some(child) => *child,
            None => panic!(
                "layouter child index {n} out of range ({} children)",
                children.len()
            ),
        }
    }

    /// Measure a child under `constraints`
    pub fn layout_child(&mut self, child: LayouterId, constraints: Constraints) -> Result<Size> {
        self.tree.layout_node(child, constraints)
    }

    /// Position a child at an absolute point
    pub fn position_child(&mut self, child: LayouterId, position: Point) -> Result<()> {
        self.tree.position_node(child, position)
    }

    /// Check a child's measured size against the constraints it was given
    pub fn check_overflow(
        &self,
        child: LayouterId,
        size: Size,
        constraints: Constraints,
    ) -> Result<()> {
        check_overflow(&*self.child_widget(child), size, constraints)
    }

    /// Widget of the element this layouter belongs to
    pub fn widget(&self) -> WidgetRef {
        self.tree.layouter_widget(self.id)
    }

    /// Widget of a child layouter's element
    pub fn child_widget(&self, child: LayouterId) -> WidgetRef {
        self.tree.layouter_widget(child)
    }

    /// Last recorded size of a child
    pub fn child_size(&self, child: LayouterId) -> Size {
        self.tree.layouters[child].size
    }

    /// Native control owned by this layouter's element
    pub fn native_handle(&self) -> Option<NativeHandle> {
        let element = self.tree.layouters[self.id].element;
        self.tree.native_handle(element)
    }

    /// The window's native backend
    pub fn backend(&mut self) -> &mut dyn NativeBackend {
        &mut *self.tree.backend
    }
}
