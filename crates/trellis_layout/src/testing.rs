//! Minimal widgets for exercising the engine in unit tests

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size, INFINITY};
use trellis_platform::{ControlKind, HeadlessBackend, NativeBackend, NativeHandle, PlatformError};

use crate::error::Result;
use crate::key::WidgetId;
use crate::layouter::{LayoutCx, Layouter};
use crate::tree::{ElementTree, TreeOptions};
use crate::widget::{
    BuildCx, Container, ElementHooks, ElementParts, Widget, WidgetKind, WidgetRef,
};

pub(crate) fn tree_with(probe: &HeadlessBackend) -> ElementTree {
    ElementTree::new(probe.boxed(), TreeOptions::default())
}

/// Label control; measured by the backend unless given a fixed size.
///
/// A fixed size is returned as-is, even when it breaks the constraints.
pub(crate) struct TestLeaf {
    id: Option<WidgetId>,
    text: String,
    size: Option<Size>,
}

impl TestLeaf {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            size: None,
        }
    }

    pub(crate) fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }
}

impl Widget for TestLeaf {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        let handle = cx.backend().create_control(ControlKind::Label, &self.text)?;
        Ok(ElementParts::new()
            .with_hooks(LeafHooks { handle })
            .with_layouter(LeafLayouter::default()))
    }
}

struct LeafHooks {
    handle: NativeHandle,
}

impl ElementHooks for LeafHooks {
    fn native_handle(&self) -> Option<NativeHandle> {
        Some(self.handle)
    }

    fn set_widget(
        &mut self,
        cx: &mut BuildCx<'_>,
        old: &dyn Widget,
        new: &dyn Widget,
    ) -> std::result::Result<(), PlatformError> {
        let old = old.downcast_ref::<TestLeaf>().unwrap();
        let new = new.downcast_ref::<TestLeaf>().unwrap();
        if old.text != new.text {
            cx.backend().set_text(self.handle, &new.text)?;
        }
        Ok(())
    }

    fn destroy(&mut self, backend: &mut dyn NativeBackend) -> std::result::Result<(), PlatformError> {
        backend.destroy_control(self.handle)
    }
}

#[derive(Default)]
struct LeafLayouter {
    size: Size,
}

impl Layouter for LeafLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let leaf = widget.downcast_ref::<TestLeaf>().unwrap();
        self.size = match leaf.size {
            Some(size) => size,
            None => {
                let handle = cx.native_handle().unwrap();
                constraints.clamp(cx.backend().measure(handle, &leaf.text)?)
            }
        };
        Ok(self.size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        let handle = cx.native_handle().unwrap();
        cx.backend().set_geometry(handle, position, self.size)?;
        Ok(())
    }
}

/// Vertical stack: wrap-content height, widest child's width
#[derive(Default)]
pub(crate) struct TestStack {
    id: Option<WidgetId>,
    children: Vec<WidgetRef>,
}

impl TestStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn child(mut self, child: impl Widget) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    pub(crate) fn children(mut self, children: impl IntoIterator<Item = WidgetRef>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Widget for TestStack {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(StackLayouter::default()))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for TestStack {
    fn num_children(&self) -> usize {
        self.children.len()
    }

    fn child(&self, n: usize) -> WidgetRef {
        self.children[n].clone()
    }
}

#[derive(Default)]
struct StackLayouter {
    offsets: Vec<Point>,
}

impl Layouter for StackLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        self.offsets.clear();
        let mut used = Size::ZERO;
        for child in cx.children() {
            let remaining = if constraints.is_unbounded_height() {
                INFINITY
            } else {
                (constraints.max_height - used.height).max(0)
            };
            let child_constraints = Constraints::new(0, 0, constraints.max_width, remaining);
            let size = cx.layout_child(child, child_constraints)?;
            cx.check_overflow(child, size, child_constraints)?;
            self.offsets.push(Point::new(0, used.height));
            used.height += size.height;
            used.width = used.width.max(size.width);
        }
        Ok(constraints.clamp(used))
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        for (child, offset) in cx.children().into_iter().zip(self.offsets.clone()) {
            cx.position_child(child, position.offset(offset))?;
        }
        Ok(())
    }
}

/// Fixed-size box forcing its children to its own size
pub(crate) struct TestBox {
    id: Option<WidgetId>,
    size: Size,
    children: Vec<WidgetRef>,
}

impl TestBox {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            id: None,
            size: Size::new(width, height),
            children: Vec::new(),
        }
    }

    pub(crate) fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn child(mut self, child: impl Widget) -> Self {
        self.children.push(Rc::new(child));
        self
    }
}

impl Widget for TestBox {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(BoxLayouter))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for TestBox {
    fn num_children(&self) -> usize {
        self.children.len()
    }

    fn child(&self, n: usize) -> WidgetRef {
        self.children[n].clone()
    }
}

struct BoxLayouter;

impl Layouter for BoxLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let size = constraints.clamp(widget.downcast_ref::<TestBox>().unwrap().size);
        let tight = Constraints::tight(size);
        for child in cx.children() {
            let child_size = cx.layout_child(child, tight)?;
            cx.check_overflow(child, child_size, tight)?;
        }
        Ok(size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        for child in cx.children() {
            cx.position_child(child, position)?;
        }
        Ok(())
    }

    fn sizing_independent_of_children(&self, _widget: &dyn Widget) -> bool {
        true
    }
}

/// A container that forgets to create a layouter
pub(crate) struct BrokenContainer;

impl Widget for BrokenContainer {
    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for BrokenContainer {
    fn num_children(&self) -> usize {
        0
    }

    fn child(&self, n: usize) -> WidgetRef {
        panic!("no child {n}")
    }
}
