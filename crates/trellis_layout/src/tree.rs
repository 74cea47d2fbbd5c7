//! Element and layouter arenas
//!
//! The element tree mirrors the widget tree one node per widget and
//! survives across rebuilds. The layouter tree is a sparse projection of it:
//! only elements that carry geometry own a layouter, and a layouter's
//! children are the nearest layouter-owning descendants of its element.
//!
//! Both trees live in slotmap arenas. Children are owned through key lists
//! and parent links are plain keys, so destroying a subtree is a top-down
//! walk that removes keys.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{trace, warn};
use trellis_core::{Constraints, Point, Size};
use trellis_platform::{NativeBackend, NativeHandle};

use crate::debug::{DebugLayouter, DebugOverlay};
use crate::error::{Result, WidgetDescriptor};
use crate::key::WidgetId;
use crate::layouter::{check_overflow, LayoutCx, Layouter};
use crate::poster::Poster;
use crate::stateful::State;
use crate::widget::{BuildCx, Container, ElementHooks, WidgetKind, WidgetRef};

new_key_type! {
    /// Key of an element in an [`ElementTree`]
    pub struct ElementId;

    /// Key of a layouter in an [`ElementTree`]
    pub struct LayouterId;
}

/// Tree-wide switches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Wrap every layouter in the debug overlay decorator
    pub debug_layout: bool,
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug_layout(mut self, enabled: bool) -> Self {
        self.debug_layout = enabled;
        self
    }
}

pub(crate) struct ElementNode {
    pub(crate) widget: WidgetRef,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) layouter: Option<LayouterId>,
    pub(crate) hooks: Option<Box<dyn ElementHooks>>,
    pub(crate) state: Option<Box<dyn State>>,
}

impl ElementNode {
    fn new(widget: WidgetRef, parent: Option<ElementId>) -> Self {
        Self {
            widget,
            parent,
            children: Vec::new(),
            layouter: None,
            hooks: None,
            state: None,
        }
    }
}

pub(crate) struct LayouterNode {
    pub(crate) element: ElementId,
    pub(crate) parent: Option<LayouterId>,
    pub(crate) children: SmallVec<[LayouterId; 4]>,
    /// Taken out while the layouter runs
    pub(crate) behavior: Option<Box<dyn Layouter>>,
    pub(crate) size: Size,
    pub(crate) position: Point,
    pub(crate) last_constraints: Option<Constraints>,
}

impl LayouterNode {
    fn new(element: ElementId, behavior: Box<dyn Layouter>) -> Self {
        Self {
            element,
            parent: None,
            children: SmallVec::new(),
            behavior: Some(behavior),
            size: Size::ZERO,
            position: Point::ORIGIN,
            last_constraints: None,
        }
    }
}

/// The live element tree of one window
///
/// # Example
///
/// ```ignore
/// let mut tree = ElementTree::new(backend.boxed(), TreeOptions::default());
/// tree.mount(Rc::new(Column::new().child(Button::new("OK"))))?;
/// tree.layout_window()?;
/// ```
pub struct ElementTree {
    pub(crate) elements: SlotMap<ElementId, ElementNode>,
    pub(crate) layouters: SlotMap<LayouterId, LayouterNode>,
    pub(crate) backend: Box<dyn NativeBackend>,
    pub(crate) poster: Poster,
    pub(crate) root: Option<ElementId>,
    pub(crate) options: TreeOptions,
    pub(crate) overlay: DebugOverlay,
}

impl ElementTree {
    /// Create an empty tree bound to a window's backend
    pub fn new(backend: Box<dyn NativeBackend>, options: TreeOptions) -> Self {
        Self {
            elements: SlotMap::with_key(),
            layouters: SlotMap::with_key(),
            backend,
            poster: Poster::new(),
            root: None,
            options,
            overlay: DebugOverlay::default(),
        }
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    // =========================================================================
    // Build & destroy
    // =========================================================================

    /// Build a fresh tree for `widget`, replacing any existing one.
    pub fn mount(&mut self, widget: WidgetRef) -> Result<ElementId> {
        if let Some(old) = self.root.take() {
            self.destroy(old);
        }
        let id = self.build(widget, None)?;
        self.root = Some(id);
        self.refresh_projection_from(id);
        Ok(id)
    }

    /// Destroy the whole tree
    pub fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            self.destroy(root);
        }
    }

    /// Build an element subtree and derive its layouter projection.
    ///
    /// Linking the subtree's top layouters to an ancestor is left to the
    /// caller, which knows where the subtree is attached.
    pub(crate) fn build(&mut self, widget: WidgetRef, parent: Option<ElementId>) -> Result<ElementId> {
        let id = self.build_elements(widget, parent)?;
        self.attach_layouters(id);
        Ok(id)
    }

    fn build_elements(&mut self, widget: WidgetRef, parent: Option<ElementId>) -> Result<ElementId> {
        let id = self.elements.insert(ElementNode::new(widget.clone(), parent));
        let parts = {
            let mut cx = BuildCx::new(&mut *self.backend, &self.poster, id);
            widget.create_element(&mut cx)
        };
        let parts = match parts {
            Ok(parts) => parts,
            Err(err) => {
                self.elements.remove(id);
                return Err(err.into());
            }
        };

        let kind = widget.kind();
        if matches!(kind, WidgetKind::Container(_)) && parts.layouter.is_none() {
            panic!(
                "container widget {} created an element without a layouter",
                WidgetDescriptor::of(&*widget)
            );
        }
        let layouter = parts.layouter.map(|behavior| {
            let behavior: Box<dyn Layouter> = if self.options.debug_layout {
                Box::new(DebugLayouter::new(behavior))
            } else {
                behavior
            };
            self.layouters.insert(LayouterNode::new(id, behavior))
        });
        let node = &mut self.elements[id];
        node.hooks = parts.hooks;
        node.layouter = layouter;
        trace!(element = ?id, widget = %WidgetDescriptor::of(&*widget), "build");

        let result = match kind {
            WidgetKind::Leaf => Ok(()),
            WidgetKind::Container(container) => self.build_children(id, container),
            WidgetKind::Stateless(stateless) => {
                let child = {
                    let cx = BuildCx::new(&mut *self.backend, &self.poster, id);
                    stateless.build(&cx)
                };
                self.build_only_child(id, child)
            }
            WidgetKind::Stateful(stateful) => {
                let state = {
                    let cx = BuildCx::new(&mut *self.backend, &self.poster, id);
                    stateful.create_state(&cx)
                };
                self.elements[id].state = Some(state);
                let child = self.build_from_state(id);
                self.build_only_child(id, child)
            }
        };
        if let Err(err) = result {
            self.destroy(id);
            return Err(err);
        }
        Ok(id)
    }

    fn build_children(&mut self, id: ElementId, container: &dyn Container) -> Result<()> {
        for n in 0..container.num_children() {
            let child = self.build_elements(container.child(n), Some(id))?;
            self.elements[id].children.push(child);
        }
        Ok(())
    }

    fn build_only_child(&mut self, id: ElementId, child: WidgetRef) -> Result<()> {
        let child = self.build_elements(child, Some(id))?;
        self.elements[id].children.push(child);
        Ok(())
    }

    /// Run the element's state builder. Panics if the element has no state.
    pub(crate) fn build_from_state(&mut self, id: ElementId) -> WidgetRef {
        let cx = BuildCx::new(&mut *self.backend, &self.poster, id);
        match self.elements[id].state.as_deref() {
            Some(state) => state.build(&cx),
            None => panic!("stateful element {id:?} has no state"),
        }
    }

    /// Destroy an element subtree, children first.
    ///
    /// Releases native controls, runs state cleanup hooks and removes the
    /// layouters. The caller unlinks `id` from its parent.
    pub(crate) fn destroy(&mut self, id: ElementId) {
        let Some(mut node) = self.elements.remove(id) else {
            return;
        };
        for child in node.children.drain(..) {
            self.destroy(child);
        }
        if let Some(mut state) = node.state.take() {
            state.dispose();
        }
        if let Some(mut hooks) = node.hooks.take() {
            if let Err(err) = hooks.destroy(&mut *self.backend) {
                warn!(
                    element = ?id,
                    widget = %WidgetDescriptor::of(&*node.widget),
                    error = %err,
                    "failed to destroy native control"
                );
            }
        }
        if let Some(layouter) = node.layouter {
            self.layouters.remove(layouter);
            self.overlay.forget(layouter);
        }
        trace!(element = ?id, "destroy");
    }

    // =========================================================================
    // Layouter projection
    // =========================================================================

    fn attach_layouters(&mut self, root: ElementId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            self.refresh_layouter_children(id);
            stack.extend(self.elements[id].children.iter().copied());
        }
    }

    /// Re-derive the child list of the element's own layouter, if it has one
    pub(crate) fn refresh_layouter_children(&mut self, id: ElementId) {
        let Some(layouter) = self.elements[id].layouter else {
            return;
        };
        let mut children = SmallVec::new();
        self.collect_layouters(id, &mut children);
        for &child in &children {
            self.layouters[child].parent = Some(layouter);
        }
        self.layouters[layouter].children = children;
    }

    /// Nearest layouter-owning descendants of `id`, in element order
    fn collect_layouters(&self, id: ElementId, out: &mut SmallVec<[LayouterId; 4]>) {
        for &child in &self.elements[id].children {
            match self.elements[child].layouter {
                Some(layouter) => out.push(layouter),
                None => self.collect_layouters(child, out),
            }
        }
    }

    /// Refresh the projection of the nearest layouter owner at or above `id`
    pub(crate) fn refresh_projection_from(&mut self, id: ElementId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.elements[current].layouter.is_some() {
                self.refresh_layouter_children(current);
                return;
            }
            cursor = self.elements[current].parent;
        }
        // No owner above: the top layouters are roots of the projection.
        if let Some(root) = self.root {
            for layouter in self.top_layouters(root) {
                self.layouters[layouter].parent = None;
            }
        }
    }

    /// Layouters at or nearest below `id`
    pub(crate) fn top_layouters(&self, id: ElementId) -> SmallVec<[LayouterId; 4]> {
        match self.elements[id].layouter {
            Some(layouter) => smallvec::smallvec![layouter],
            None => {
                let mut out = SmallVec::new();
                self.collect_layouters(id, &mut out);
                out
            }
        }
    }

    /// Layouter of the nearest strict ancestor of `id` that owns one
    pub(crate) fn ancestor_layouter(&self, id: ElementId) -> Option<LayouterId> {
        let mut cursor = self.elements[id].parent;
        while let Some(current) = cursor {
            if let Some(layouter) = self.elements[current].layouter {
                return Some(layouter);
            }
            cursor = self.elements[current].parent;
        }
        None
    }

    // =========================================================================
    // Layout passes
    // =========================================================================

    /// Lay the tree out in a window client area of `size`.
    ///
    /// The root is measured under `{0, 0, width, height}` and positioned at
    /// the origin. Returns the root's size.
    pub fn layout(&mut self, size: Size) -> Result<Size> {
        let Some(root) = self.root_layouter() else {
            return Ok(Size::ZERO);
        };
        let constraints = Constraints::loose(size);
        let measured = self.layout_node(root, constraints)?;
        check_overflow(&*self.layouter_widget(root), measured, constraints)?;
        self.position_node(root, Point::ORIGIN)?;
        Ok(measured)
    }

    /// Lay the tree out in the backend's current client area
    pub fn layout_window(&mut self) -> Result<Size> {
        let size = self.backend.client_size()?;
        self.layout(size)
    }

    pub(crate) fn layout_node(&mut self, id: LayouterId, constraints: Constraints) -> Result<Size> {
        let Some(mut behavior) = self.layouters[id].behavior.take() else {
            panic!("re-entrant layout of {id:?}");
        };
        let result = behavior.layout(&mut LayoutCx::new(self, id), constraints);
        let node = &mut self.layouters[id];
        node.behavior = Some(behavior);
        let size = result?;
        node.size = size;
        node.last_constraints = Some(constraints);
        trace!(layouter = ?id, %constraints, %size, "layout");
        Ok(size)
    }

    pub(crate) fn position_node(&mut self, id: LayouterId, position: Point) -> Result<()> {
        let Some(mut behavior) = self.layouters[id].behavior.take() else {
            panic!("re-entrant positioning of {id:?}");
        };
        self.layouters[id].position = position;
        let result = behavior.position_at(&mut LayoutCx::new(self, id), position);
        self.layouters[id].behavior = Some(behavior);
        result
    }

    // =========================================================================
    // Posted tasks
    // =========================================================================

    /// Handle for enqueueing work from native callbacks
    pub fn poster(&self) -> Poster {
        self.poster.clone()
    }

    /// Run queued tasks until the queue is empty.
    ///
    /// Stops at the first failing task and returns its error; later tasks
    /// stay queued. Returns the number of tasks run.
    pub fn run_posted(&mut self) -> Result<usize> {
        let mut ran = 0;
        while let Some(task) = self.poster.pop() {
            task(self)?;
            ran += 1;
        }
        Ok(ran)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Top of the layouter tree
    pub fn root_layouter(&self) -> Option<LayouterId> {
        self.root
            .and_then(|root| self.top_layouters(root).first().copied())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn layouter_count(&self) -> usize {
        self.layouters.len()
    }

    /// Widget last applied to an element
    pub fn widget(&self, id: ElementId) -> Option<WidgetRef> {
        self.elements.get(id).map(|node| node.widget.clone())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Layouter owned by an element
    pub fn layouter_of(&self, id: ElementId) -> Option<LayouterId> {
        self.elements.get(id).and_then(|node| node.layouter)
    }

    pub fn has_state(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .is_some_and(|node| node.state.is_some())
    }

    /// Native control owned by an element
    pub fn native_handle(&self, id: ElementId) -> Option<NativeHandle> {
        self.elements
            .get(id)
            .and_then(|node| node.hooks.as_ref())
            .and_then(|hooks| hooks.native_handle())
    }

    /// Element a layouter belongs to
    pub fn layouter_element(&self, id: LayouterId) -> Option<ElementId> {
        self.layouters.get(id).map(|node| node.element)
    }

    pub fn layouter_parent(&self, id: LayouterId) -> Option<LayouterId> {
        self.layouters.get(id).and_then(|node| node.parent)
    }

    pub fn layouter_children(&self, id: LayouterId) -> &[LayouterId] {
        self.layouters
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Size recorded by the last layout of a layouter
    pub fn size(&self, id: LayouterId) -> Option<Size> {
        self.layouters.get(id).map(|node| node.size)
    }

    /// Position recorded by the last positioning of a layouter
    pub fn position(&self, id: LayouterId) -> Option<Point> {
        self.layouters.get(id).map(|node| node.position)
    }

    /// Constraints of the last successful layout of a layouter
    pub fn last_constraints(&self, id: LayouterId) -> Option<Constraints> {
        self.layouters.get(id).and_then(|node| node.last_constraints)
    }

    /// First element, in depth-first order, whose widget has `id`
    pub fn find(&self, id: &WidgetId) -> Option<ElementId> {
        let mut stack: Vec<ElementId> = self.root.into_iter().collect();
        while let Some(current) = stack.pop() {
            let node = &self.elements[current];
            if node.widget.widget_id() == Some(id) {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    pub fn backend(&self) -> &dyn NativeBackend {
        &*self.backend
    }

    pub fn backend_mut(&mut self) -> &mut dyn NativeBackend {
        &mut *self.backend
    }

    pub(crate) fn layouter_widget(&self, id: LayouterId) -> WidgetRef {
        self.elements[self.layouters[id].element].widget.clone()
    }
}

impl Drop for ElementTree {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTree")
            .field("root", &self.root)
            .field("elements", &self.elements.len())
            .field("layouters", &self.layouters.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;
    use crate::stateful::stateless;
    use crate::testing::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use trellis_platform::{BackendCall, ControlKind, HeadlessBackend};

    fn sample() -> Rc<TestStack> {
        Rc::new(
            TestStack::new()
                .child(TestLeaf::new("a").id("a"))
                .child(TestStack::new().id("inner").child(TestLeaf::new("b")))
                .child(TestLeaf::new("c")),
        )
    }

    #[test]
    fn test_build_is_depth_first() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let root = tree.mount(sample()).unwrap();

        let created: Vec<_> = probe
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Create { kind, text, .. } => Some((kind, text)),
                _ => None,
            })
            .collect();
        assert_eq!(
            created,
            vec![
                (ControlKind::Label, "a".to_string()),
                (ControlKind::Label, "b".to_string()),
                (ControlKind::Label, "c".to_string()),
            ]
        );
        assert_eq!(tree.element_count(), 5);
        assert_eq!(tree.layouter_count(), 5);
        assert_eq!(tree.children(root).len(), 3);
        for &child in tree.children(root) {
            assert_eq!(tree.parent(child), Some(root));
        }
    }

    #[test]
    fn test_projection_mirrors_elements() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let root = tree.mount(sample()).unwrap();
        let root_layouter = tree.root_layouter().unwrap();

        let expected: Vec<_> = tree
            .children(root)
            .iter()
            .map(|&child| tree.layouter_of(child).unwrap())
            .collect();
        assert_eq!(tree.layouter_children(root_layouter), expected.as_slice());
        for &child in &expected {
            assert_eq!(tree.layouter_parent(child), Some(root_layouter));
        }
        assert_eq!(tree.layouter_parent(root_layouter), None);
        assert_eq!(tree.layouter_element(root_layouter), Some(root));
    }

    #[test]
    fn test_projection_skips_wrappers() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let root = tree
            .mount(Rc::new(TestStack::new().child(stateless(None, |_| {
                Rc::new(stateless(None, |_| Rc::new(TestLeaf::new("deep")) as WidgetRef))
                    as WidgetRef
            }))))
            .unwrap();

        let wrapper = tree.children(root)[0];
        let inner = tree.children(wrapper)[0];
        let leaf = tree.children(inner)[0];
        assert_eq!(tree.layouter_of(wrapper), None);
        assert_eq!(tree.layouter_of(inner), None);

        let root_layouter = tree.root_layouter().unwrap();
        let leaf_layouter = tree.layouter_of(leaf).unwrap();
        assert_eq!(tree.layouter_children(root_layouter), &[leaf_layouter]);
        assert_eq!(tree.layouter_parent(leaf_layouter), Some(root_layouter));
    }

    #[test]
    fn test_wrapper_root_exposes_nearest_layouter() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let root = tree
            .mount(Rc::new(stateless(None, |_| Rc::new(TestLeaf::new("x")) as WidgetRef)))
            .unwrap();
        let leaf = tree.children(root)[0];
        assert_eq!(tree.root_layouter(), tree.layouter_of(leaf));
        assert_eq!(tree.layout_window().unwrap(), Size::new(8, 16));
    }

    #[test]
    #[should_panic(expected = "without a layouter")]
    fn test_container_without_layouter_panics() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let _ = tree.mount(Rc::new(BrokenContainer));
    }

    #[test]
    fn test_build_error_propagates_and_cleans_up() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        probe.fail_next_create("no handles");

        let err = tree.mount(sample()).unwrap_err();
        assert!(matches!(err, UiError::Platform(_)));
        assert_eq!(tree.root(), None);
        assert_eq!(tree.element_count(), 0);
        assert_eq!(tree.layouter_count(), 0);
        assert_eq!(probe.live_controls(), 0);
    }

    #[test]
    fn test_layout_sizes_and_positions() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        tree.mount(Rc::new(
            TestStack::new()
                .child(TestLeaf::new("first").id(1).size(100, 40))
                .child(TestLeaf::new("second").id(2).size(60, 30)),
        ))
        .unwrap();

        assert_eq!(tree.layout(Size::new(300, 200)).unwrap(), Size::new(100, 70));

        let second = tree.find(&2.into()).unwrap();
        let layouter = tree.layouter_of(second).unwrap();
        assert_eq!(tree.position(layouter), Some(Point::new(0, 40)));
        assert_eq!(tree.size(layouter), Some(Size::new(60, 30)));
        assert_eq!(
            tree.last_constraints(layouter),
            Some(Constraints::new(0, 0, 300, 160))
        );
        let handle = tree.native_handle(second).unwrap();
        assert_eq!(
            probe.rect(handle),
            Some(trellis_core::Rect::new(0, 40, 60, 70))
        );
    }

    #[test]
    fn test_child_overflow_is_reported() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        tree.mount(Rc::new(
            TestStack::new()
                .child(TestLeaf::new("ok").size(10, 10))
                .child(TestLeaf::new("wide").id("wide").size(400, 10)),
        ))
        .unwrap();

        match tree.layout_window() {
            Err(UiError::Overflow(err)) => {
                assert_eq!(err.widget.id, Some("wide".into()));
                assert!(err.widget.type_name.ends_with("TestLeaf"));
                assert_eq!(err.size, Size::new(400, 10));
                assert_eq!(err.constraints, Constraints::new(0, 0, 300, 190));
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_root_overflow_is_reported() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        tree.mount(Rc::new(TestLeaf::new("huge").size(10, 500)))
            .unwrap();
        assert!(matches!(tree.layout_window(), Err(UiError::Overflow(_))));
    }

    #[test]
    fn test_empty_tree_layout() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        assert_eq!(tree.layout_window().unwrap(), Size::ZERO);
        assert_eq!(tree.root_layouter(), None);
    }

    #[test]
    fn test_unmount_and_drop_release_controls() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        tree.mount(sample()).unwrap();
        assert_eq!(probe.live_controls(), 3);
        tree.unmount();
        assert_eq!(probe.live_controls(), 0);
        assert_eq!(tree.element_count(), 0);

        tree.mount(sample()).unwrap();
        drop(tree);
        assert_eq!(probe.live_controls(), 0);
    }

    #[test]
    fn test_run_posted_drains_queue() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let ran = Rc::new(Cell::new(0));
        let poster = tree.poster();
        for _ in 0..2 {
            let ran = ran.clone();
            poster.post(move |_| {
                ran.set(ran.get() + 1);
                Ok(())
            });
        }
        assert_eq!(poster.len(), 2);
        assert_eq!(tree.run_posted().unwrap(), 2);
        assert_eq!(ran.get(), 2);
        assert!(poster.is_empty());
    }

    #[test]
    fn test_run_posted_stops_at_first_error() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let poster = tree.poster();
        poster.post(|_| Err(UiError::StaleState));
        poster.post(|_| Ok(()));

        assert!(matches!(tree.run_posted(), Err(UiError::StaleState)));
        assert_eq!(poster.len(), 1);
    }
}
