//! Empty space around a child

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size, INFINITY};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

/// Insets its child by fixed amounts on each side
#[derive(Clone, Default)]
pub struct Padding {
    id: Option<WidgetId>,
    child: Option<WidgetRef>,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Padding {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            ..Self::default()
        }
    }

    /// The same inset on every side
    pub fn all(inset: i32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// `horizontal` on the left and right, `vertical` on the top and bottom
    pub fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
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

    fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

impl Widget for Padding {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(PaddingLayouter))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for Padding {
    fn num_children(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child(&self, n: usize) -> WidgetRef {
        match (&self.child, n) {
            (Some(child), 0) => child.clone(),
            _ => panic!("Padding has no child {n}"),
        }
    }
}

/// Shrink one axis of constraints by `inset`, leaving unbounded maxima alone
fn deflate(min: i32, max: i32, inset: i32) -> (i32, i32) {
    let min = (min - inset).max(0);
    let max = if max == INFINITY {
        INFINITY
    } else {
        (max - inset).max(min)
    };
    (min, max)
}

struct PaddingLayouter;

impl Layouter for PaddingLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let Some(padding) = widget.downcast_ref::<Padding>() else {
            panic!("Padding layouter attached to {}", AsAny::type_name(&*widget));
        };

        let mut child_size = Size::ZERO;
        if let Some(&child) = cx.children().first() {
            let (min_width, max_width) =
                deflate(constraints.min_width, constraints.max_width, padding.horizontal());
            let (min_height, max_height) =
                deflate(constraints.min_height, constraints.max_height, padding.vertical());
            let child_constraints = Constraints::new(min_width, min_height, max_width, max_height);
            child_size = cx.layout_child(child, child_constraints)?;
            cx.check_overflow(child, child_size, child_constraints)?;
        }

        Ok(constraints.clamp(Size::new(
            child_size.width.saturating_add(padding.horizontal()),
            child_size.height.saturating_add(padding.vertical()),
        )))
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        let widget = cx.widget();
        let inset = match widget.downcast_ref::<Padding>() {
            Some(padding) => Point::new(padding.left, padding.top),
            None => Point::ORIGIN,
        };
        for child in cx.children() {
            cx.position_child(child, position.offset(inset))?;
        }
        Ok(())
    }
}
