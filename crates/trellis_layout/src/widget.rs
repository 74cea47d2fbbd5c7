//! Widget contracts
//!
//! A widget is an immutable description of one node of desired UI. The
//! engine sees every widget through [`Widget`] and resolves its capability
//! once per node with [`Widget::kind`]:
//!
//! - [`WidgetKind::Leaf`] - no declared children; usually owns a native
//!   control and a layouter
//! - [`WidgetKind::Container`] - an ordered list of child widgets; must
//!   create a layouter
//! - [`WidgetKind::Stateful`] - owns a [`State`] that survives rebuilds and
//!   builds exactly one child from it
//! - [`WidgetKind::Stateless`] - builds exactly one child from itself
//!
//! Widgets are shared as [`WidgetRef`] and must not change once handed to
//! the tree.

use std::any::{Any, TypeId};
use std::rc::Rc;

use trellis_platform::{NativeBackend, NativeHandle, PlatformError};

use crate::key::WidgetId;
use crate::layouter::Layouter;
use crate::poster::Poster;
use crate::stateful::{State, StateHandle};
use crate::tree::ElementId;

/// Shared reference to an immutable widget
pub type WidgetRef = Rc<dyn Widget>;

/// Dynamic type access for widgets and states
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Capability of a widget, resolved once per node during build and reconcile
#[derive(Clone, Copy)]
pub enum WidgetKind<'a> {
    Leaf,
    Container(&'a dyn Container),
    Stateful(&'a dyn StatefulWidget),
    Stateless(&'a dyn StatelessWidget),
}

/// An immutable description of one UI node
pub trait Widget: AsAny {
    /// Identity token used to match this widget against the previous build
    fn widget_id(&self) -> Option<&WidgetId> {
        None
    }

    /// Create the element-side objects for this widget.
    ///
    /// Called once when the element is built. Native-facing widgets create
    /// their control here.
    fn create_element(&self, cx: &mut BuildCx<'_>) -> Result<ElementParts, PlatformError> {
        let _ = cx;
        Ok(ElementParts::default())
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Leaf
    }
}

impl<'a> dyn Widget + 'a {
    /// Borrow the widget as its concrete type
    pub fn downcast_ref<W: Widget>(&self) -> Option<&W> {
        self.as_any().downcast_ref::<W>()
    }

    pub fn is<W: Widget>(&self) -> bool {
        self.as_any().is::<W>()
    }
}

/// A widget with an ordered list of children
pub trait Container {
    fn num_children(&self) -> usize;

    /// The `n`th child. Panics when `n >= num_children()`.
    fn child(&self, n: usize) -> WidgetRef;
}

/// A widget that is a pure function to exactly one child
pub trait StatelessWidget {
    fn build(&self, cx: &BuildCx<'_>) -> WidgetRef;
}

/// A widget whose element owns a long-lived [`State`]
pub trait StatefulWidget {
    /// Create the state. Called once per element, when it is first built.
    fn create_state(&self, cx: &BuildCx<'_>) -> Box<dyn State>;
}

/// Whether two widgets describe the same logical node.
///
/// True when both ids are equal (two absent ids count as equal) and both
/// widgets have the same concrete type.
pub fn widget_match(a: &dyn Widget, b: &dyn Widget) -> bool {
    a.widget_id() == b.widget_id() && widget_type(a) == widget_type(b)
}

fn widget_type(widget: &dyn Widget) -> TypeId {
    Any::type_id(widget.as_any())
}

/// Context handed to widget factories, builders and element hooks
pub struct BuildCx<'a> {
    backend: &'a mut dyn NativeBackend,
    poster: &'a Poster,
    element: ElementId,
}

impl<'a> BuildCx<'a> {
    pub(crate) fn new(
        backend: &'a mut dyn NativeBackend,
        poster: &'a Poster,
        element: ElementId,
    ) -> Self {
        Self {
            backend,
            poster,
            element,
        }
    }

    /// The window's native backend
    pub fn backend(&mut self) -> &mut dyn NativeBackend {
        &mut *self.backend
    }

    /// Queue for work triggered from native callbacks
    pub fn poster(&self) -> &Poster {
        self.poster
    }

    /// The element being built or updated
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Handle naming the element being built, for use with
    /// [`ElementTree::update_state`](crate::ElementTree::update_state).
    pub fn state_handle(&self) -> StateHandle {
        StateHandle::new(self.element)
    }
}

/// Objects a widget factory attaches to its new element
#[derive(Default)]
pub struct ElementParts {
    pub hooks: Option<Box<dyn ElementHooks>>,
    pub layouter: Option<Box<dyn Layouter>>,
}

impl ElementParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hooks(mut self, hooks: impl ElementHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn with_layouter(mut self, layouter: impl Layouter + 'static) -> Self {
        self.layouter = Some(Box::new(layouter));
        self
    }
}

/// Element-side behavior of native-facing widgets
pub trait ElementHooks {
    /// The native control owned by the element, if any
    fn native_handle(&self) -> Option<NativeHandle> {
        None
    }

    /// Apply a matching widget to the element.
    ///
    /// Implementations compare `old` and `new` and only push fields that
    /// actually changed to the backend.
    fn set_widget(
        &mut self,
        cx: &mut BuildCx<'_>,
        old: &dyn Widget,
        new: &dyn Widget,
    ) -> Result<(), PlatformError> {
        let _ = (cx, old, new);
        Ok(())
    }

    /// Release native resources. Called once, when the element is destroyed.
    fn destroy(&mut self, backend: &mut dyn NativeBackend) -> Result<(), PlatformError> {
        let _ = backend;
        Ok(())
    }
}

/// Hooks for an element that owns one native control and nothing else
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeControl {
    handle: NativeHandle,
}

impl NativeControl {
    pub fn new(handle: NativeHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }
}

impl ElementHooks for NativeControl {
    fn native_handle(&self) -> Option<NativeHandle> {
        Some(self.handle)
    }

    fn destroy(&mut self, backend: &mut dyn NativeBackend) -> Result<(), PlatformError> {
        backend.destroy_control(self.handle)
    }
}
