//! Stateful widgets and the state update entry point
//!
//! The element of a [`StatefulWidget`] owns a [`State`] created on first
//! build. Matching rebuilds keep the same state object; only a failed
//! widget match creates a new one. External code mutates it through
//! [`ElementTree::update_state`], which rebuilds the subtree, reconciles it
//! and re-lays it out:
//!
//! ```ignore
//! struct Counter { count: i32 }
//!
//! impl State for Counter {
//!     fn build(&self, cx: &BuildCx<'_>) -> WidgetRef {
//!         let handle = cx.state_handle();
//!         Rc::new(Button::new(self.count.to_string()).on_click(move |tree| {
//!             tree.update_state::<Counter>(handle, |c| c.count += 1)
//!         }))
//!     }
//! }
//! ```
//!
//! Re-layout first tries to **replay** the nearest ancestor layouter whose
//! size does not depend on its children, using the constraints and position
//! cached by the previous pass. When there is none the whole window is laid
//! out again.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{Result, UiError};
use crate::key::WidgetId;
use crate::layouter::check_overflow;
use crate::tree::{ElementId, ElementTree, LayouterId};
use crate::widget::{AsAny, BuildCx, StatefulWidget, StatelessWidget, Widget, WidgetKind, WidgetRef};

/// Long-lived state owned by a stateful element
pub trait State: AsAny {
    /// Build the element's single child from the current state
    fn build(&self, cx: &BuildCx<'_>) -> WidgetRef;

    /// Cleanup hook, run when the owning element is destroyed
    fn dispose(&mut self) {}
}

/// Names a stateful element from outside the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateHandle(ElementId);

impl StateHandle {
    pub(crate) fn new(element: ElementId) -> Self {
        Self(element)
    }

    pub fn element(&self) -> ElementId {
        self.0
    }
}

// =============================================================================
// Closure adapters
// =============================================================================

type BuildFn = Rc<dyn Fn(&BuildCx<'_>) -> WidgetRef>;

/// Stateless widget backed by a closure
#[derive(Clone)]
pub struct StatelessFn {
    id: Option<WidgetId>,
    build: BuildFn,
}

/// Create a stateless widget from a build closure
pub fn stateless(
    id: Option<WidgetId>,
    build: impl Fn(&BuildCx<'_>) -> WidgetRef + 'static,
) -> StatelessFn {
    StatelessFn {
        id,
        build: Rc::new(build),
    }
}

impl Widget for StatelessFn {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Stateless(self)
    }
}

impl StatelessWidget for StatelessFn {
    fn build(&self, cx: &BuildCx<'_>) -> WidgetRef {
        (self.build)(cx)
    }
}

/// Stateful widget backed by a state factory closure
#[derive(Clone)]
pub struct StatefulFn {
    id: Option<WidgetId>,
    create: Rc<dyn Fn(&BuildCx<'_>) -> Box<dyn State>>,
}

/// Create a stateful widget from a state factory
pub fn stateful(
    id: Option<WidgetId>,
    create: impl Fn(&BuildCx<'_>) -> Box<dyn State> + 'static,
) -> StatefulFn {
    StatefulFn {
        id,
        create: Rc::new(create),
    }
}

impl Widget for StatefulFn {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Stateful(self)
    }
}

impl StatefulWidget for StatefulFn {
    fn create_state(&self, cx: &BuildCx<'_>) -> Box<dyn State> {
        (self.create)(cx)
    }
}

/// State made of a build closure and an optional cleanup closure.
///
/// The mutable data usually lives in cells captured by the closure; call
/// [`ElementTree::rebuild`] after changing it.
pub struct FnState {
    build: BuildFn,
    dispose: Option<Box<dyn FnMut()>>,
}

impl FnState {
    pub fn new(build: impl Fn(&BuildCx<'_>) -> WidgetRef + 'static) -> Self {
        Self {
            build: Rc::new(build),
            dispose: None,
        }
    }

    pub fn on_dispose(mut self, dispose: impl FnMut() + 'static) -> Self {
        self.dispose = Some(Box::new(dispose));
        self
    }
}

impl State for FnState {
    fn build(&self, cx: &BuildCx<'_>) -> WidgetRef {
        (self.build)(cx)
    }

    fn dispose(&mut self) {
        if let Some(dispose) = self.dispose.as_mut() {
            dispose();
        }
    }
}

impl fmt::Debug for FnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnState")
            .field("dispose", &self.dispose.is_some())
            .finish()
    }
}

// =============================================================================
// Update entry point & replay
// =============================================================================

/// Result of trying to replay a cached layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReplayOutcome {
    Replayed(LayouterId),
    Unavailable,
}

impl ElementTree {
    /// Mutate a stateful element's state, then rebuild and re-lay out its
    /// subtree.
    ///
    /// Fails with [`UiError::StaleState`] when the element is gone and with
    /// [`UiError::StateType`] when its state is not an `S`.
    pub fn update_state<S: State>(
        &mut self,
        handle: StateHandle,
        update: impl FnOnce(&mut S),
    ) -> Result<()> {
        let state = self
            .elements
            .get_mut(handle.0)
            .and_then(|node| node.state.as_deref_mut())
            .ok_or(UiError::StaleState)?;
        let found = AsAny::type_name(&*state);
        let state = state
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(UiError::StateType {
                expected: std::any::type_name::<S>(),
                found,
            })?;
        update(state);
        self.rebuild(handle)
    }

    /// Rebuild a stateful element from its current state, reconcile the
    /// result and re-lay out.
    pub fn rebuild(&mut self, handle: StateHandle) -> Result<()> {
        let id = handle.0;
        if !self.has_state(id) {
            return Err(UiError::StaleState);
        }
        trace!(element = ?id, "rebuild");
        let child = self.build_from_state(id);
        self.reconcile_only_child(id, child)?;
        self.relayout(id)
    }

    /// Re-lay out after the subtree under `id` changed
    fn relayout(&mut self, id: ElementId) -> Result<()> {
        match self.replay(id)? {
            ReplayOutcome::Replayed(layouter) => {
                trace!(element = ?id, layouter = ?layouter, "replayed layout");
                Ok(())
            }
            ReplayOutcome::Unavailable => {
                debug!(element = ?id, "no replayable ancestor, full layout");
                self.layout_window().map(|_| ())
            }
        }
    }

    /// Replay the nearest ancestor whose size is independent of its
    /// children, starting above the layouters of the changed subtree.
    fn replay(&mut self, id: ElementId) -> Result<ReplayOutcome> {
        let mut cursor = match self.top_layouters(id).first() {
            Some(&top) => self.layouters[top].parent,
            None => self.ancestor_layouter(id),
        };
        while let Some(layouter) = cursor {
            let node = &self.layouters[layouter];
            let widget = &self.elements[node.element].widget;
            let independent = node
                .behavior
                .as_ref()
                .is_some_and(|behavior| behavior.sizing_independent_of_children(&**widget));
            if let (true, Some(constraints)) = (independent, node.last_constraints) {
                let position = node.position;
                let size = self.layout_node(layouter, constraints)?;
                check_overflow(&*self.layouter_widget(layouter), size, constraints)?;
                self.position_node(layouter, position)?;
                return Ok(ReplayOutcome::Replayed(layouter));
            }
            cursor = node.parent;
        }
        Ok(ReplayOutcome::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::cell::{Cell, RefCell};
    use trellis_core::{Point, Size};
    use trellis_platform::{BackendCall, HeadlessBackend};

    struct Counter {
        count: i32,
        disposed: Rc<Cell<bool>>,
    }

    impl State for Counter {
        fn build(&self, _cx: &BuildCx<'_>) -> WidgetRef {
            Rc::new(TestLeaf::new(format!("count {}", self.count)).id("label"))
        }

        fn dispose(&mut self) {
            self.disposed.set(true);
        }
    }

    fn counter(
        handle: Rc<Cell<Option<StateHandle>>>,
        disposed: Rc<Cell<bool>>,
    ) -> StatefulFn {
        stateful(Some("counter".into()), move |cx| {
            handle.set(Some(cx.state_handle()));
            Box::new(Counter {
                count: 0,
                disposed: disposed.clone(),
            })
        })
    }

    #[test]
    fn test_update_state_keeps_elements() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        let disposed = Rc::new(Cell::new(false));
        tree.mount(Rc::new(
            TestStack::new().child(counter(handle.clone(), disposed.clone())),
        ))
        .unwrap();
        tree.layout_window().unwrap();

        let label = tree.find(&"label".into()).unwrap();
        let control = tree.native_handle(label).unwrap();
        let handle = handle.get().unwrap();
        probe.clear_calls();

        tree.update_state::<Counter>(handle, |c| c.count += 1)
            .unwrap();

        assert_eq!(tree.find(&"label".into()), Some(label));
        assert_eq!(probe.text(control).as_deref(), Some("count 1"));
        assert!(probe.calls().contains(&BackendCall::SetText {
            handle: control,
            text: "count 1".to_string()
        }));
        assert!(!disposed.get());
    }

    #[test]
    fn test_update_state_wrong_type() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        tree.mount(Rc::new(counter(handle.clone(), Rc::new(Cell::new(false)))))
            .unwrap();

        let err = tree
            .update_state::<FnState>(handle.get().unwrap(), |_| {})
            .unwrap_err();
        assert!(matches!(err, UiError::StateType { .. }));
    }

    #[test]
    fn test_stale_handle_after_destroy() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        let disposed = Rc::new(Cell::new(false));
        tree.mount(Rc::new(counter(handle.clone(), disposed.clone())))
            .unwrap();
        let handle = handle.get().unwrap();

        tree.update(Rc::new(TestLeaf::new("other"))).unwrap();

        assert!(disposed.get());
        assert!(matches!(
            tree.update_state::<Counter>(handle, |c| c.count += 1),
            Err(UiError::StaleState)
        ));
        assert!(matches!(tree.rebuild(handle), Err(UiError::StaleState)));
    }

    #[test]
    fn test_state_survives_parent_rebuild() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        let disposed = Rc::new(Cell::new(false));
        let root = || {
            Rc::new(TestStack::new().child(counter(handle.clone(), disposed.clone())))
        };
        tree.mount(root()).unwrap();
        let first = handle.get().unwrap();
        tree.update_state::<Counter>(first, |c| c.count = 5).unwrap();

        tree.update(root()).unwrap();

        assert_eq!(handle.get(), Some(first));
        let label = tree.find(&"label".into()).unwrap();
        let control = tree.native_handle(label).unwrap();
        assert_eq!(probe.text(control).as_deref(), Some("count 5"));
    }

    #[test]
    fn test_fn_state_rebuild_and_dispose() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let text = Rc::new(RefCell::new("a".to_string()));
        let disposed = Rc::new(Cell::new(0));
        let handle = Rc::new(Cell::new(None));

        let widget = {
            let text = text.clone();
            let disposed = disposed.clone();
            let handle = handle.clone();
            stateful(None, move |cx| {
                handle.set(Some(cx.state_handle()));
                let text = text.clone();
                let disposed = disposed.clone();
                Box::new(
                    FnState::new(move |_| Rc::new(TestLeaf::new(text.borrow().clone())))
                        .on_dispose(move || disposed.set(disposed.get() + 1)),
                )
            })
        };
        let root = tree.mount(Rc::new(widget)).unwrap();
        let leaf = tree.children(root)[0];

        *text.borrow_mut() = "b".to_string();
        tree.rebuild(handle.get().unwrap()).unwrap();

        assert_eq!(tree.children(root), &[leaf]);
        let control = tree.native_handle(leaf).unwrap();
        assert_eq!(probe.text(control).as_deref(), Some("b"));

        tree.unmount();
        assert_eq!(disposed.get(), 1);
        assert_eq!(probe.live_controls(), 0);
    }

    #[test]
    fn test_stateless_closure_rebuilds_child() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let make = |label: &'static str| {
            Rc::new(stateless(Some(1.into()), move |_| {
                Rc::new(TestLeaf::new(label)) as WidgetRef
            }))
        };
        let root = tree.mount(make("x")).unwrap();
        let leaf = tree.children(root)[0];

        assert_eq!(tree.update(make("y")).unwrap(), root);
        assert_eq!(tree.children(root), &[leaf]);
        assert_eq!(probe.text(tree.native_handle(leaf).unwrap()).as_deref(), Some("y"));
    }

    #[test]
    fn test_replay_reuses_cached_constraints() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        let disposed = Rc::new(Cell::new(false));
        tree.mount(Rc::new(
            TestStack::new()
                .child(TestLeaf::new("top").size(50, 20))
                .child(TestBox::new(120, 60).id("box").child(counter(handle.clone(), disposed))),
        ))
        .unwrap();
        let full = tree.layout_window().unwrap();

        let fixed = tree.find(&"box".into()).unwrap();
        let fixed_layouter = tree.layouter_of(fixed).unwrap();
        let cached = tree.last_constraints(fixed_layouter).unwrap();
        let root_layouter = tree.root_layouter().unwrap();
        let root_constraints = tree.last_constraints(root_layouter);

        // A full pass would pick up the new client area.
        probe.set_client_size(Size::new(400, 100));
        tree.update_state::<Counter>(handle.get().unwrap(), |c| c.count += 10)
            .unwrap();

        // Only the fixed box was laid out again, with the cached input.
        assert_eq!(tree.last_constraints(fixed_layouter), Some(cached));
        assert_eq!(tree.position(fixed_layouter), Some(Point::new(0, 20)));
        assert_eq!(tree.size(fixed_layouter), Some(Size::new(120, 60)));
        assert_eq!(tree.last_constraints(root_layouter), root_constraints);
        assert_eq!(tree.layout_window().unwrap(), full);

        let label = tree.find(&"label".into()).unwrap();
        let label_layouter = tree.layouter_of(label).unwrap();
        assert_eq!(tree.position(label_layouter), Some(Point::new(0, 20)));
    }

    #[test]
    fn test_no_replayable_ancestor_falls_back_to_full_layout() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        tree.mount(Rc::new(
            TestStack::new()
                .child(TestLeaf::new("top").size(50, 20))
                .child(counter(handle.clone(), Rc::new(Cell::new(false)))),
        ))
        .unwrap();
        tree.layout_window().unwrap();
        let root_layouter = tree.root_layouter().unwrap();

        probe.set_client_size(Size::new(400, 100));
        tree.update_state::<Counter>(handle.get().unwrap(), |c| c.count += 1)
            .unwrap();

        // The fallback re-reads the client area.
        assert_eq!(
            tree.last_constraints(root_layouter).map(|c| c.max_size()),
            Some(Size::new(400, 100))
        );
    }

    #[test]
    fn test_never_laid_out_box_is_not_replayed() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        let handle = Rc::new(Cell::new(None));
        tree.mount(Rc::new(
            TestBox::new(100, 100).child(counter(handle.clone(), Rc::new(Cell::new(false)))),
        ))
        .unwrap();

        tree.update_state::<Counter>(handle.get().unwrap(), |c| c.count += 1)
            .unwrap();

        let root_layouter = tree.root_layouter().unwrap();
        assert_eq!(
            tree.last_constraints(root_layouter),
            Some(trellis_core::Constraints::loose(Size::new(300, 200)))
        );
    }
}
