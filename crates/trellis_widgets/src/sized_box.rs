//! Fixed-size box

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

/// A box of a fixed size, clamped to the incoming constraints.
///
/// The child, if any, is forced to exactly the box's size. Because the
/// box's own size never depends on its child, a state update below it only
/// re-lays out the box's subtree.
#[derive(Clone, Default)]
pub struct SizedBox {
    id: Option<WidgetId>,
    child: Option<WidgetRef>,
    width: i32,
    height: i32,
}

impl SizedBox {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn child(mut self, child: impl Widget) -> Self {
        self.child = Some(Rc::new(child));
        self
    }

    pub fn shared_child(mut self, child: WidgetRef) -> Self {
        self.child = Some(child);
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Widget for SizedBox {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(SizedBoxLayouter))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for SizedBox {
    fn num_children(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child(&self, n: usize) -> WidgetRef {
        match (&self.child, n) {
            (Some(child), 0) => child.clone(),
            _ => panic!("SizedBox has no child {n}"),
        }
    }
}

struct SizedBoxLayouter;

impl Layouter for SizedBoxLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let size = match widget.downcast_ref::<SizedBox>() {
            Some(sized) => constraints.clamp(sized.size()),
            None => panic!("SizedBox layouter attached to {}", AsAny::type_name(&*widget)),
        };
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
