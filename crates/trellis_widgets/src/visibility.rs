//! Show or hide a child

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

/// Shows or hides its child without destroying it.
///
/// A hidden child keeps its element, state and native control. It is
/// moved past the right edge of the window's client area instead. With
/// `maintain_size` the hidden child still takes up its space; without it
/// the box collapses to the minimum the constraints allow.
#[derive(Clone)]
pub struct Visibility {
    id: Option<WidgetId>,
    child: Option<WidgetRef>,
    visible: bool,
    maintain_size: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            id: None,
            child: None,
            visible: true,
            maintain_size: false,
        }
    }
}

impl Visibility {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
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

    pub fn maintain_size(mut self, maintain: bool) -> Self {
        self.maintain_size = maintain;
        self
    }
}

impl Widget for Visibility {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(VisibilityLayouter::default()))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for Visibility {
    fn num_children(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child(&self, n: usize) -> WidgetRef {
        match (&self.child, n) {
            (Some(child), 0) => child.clone(),
            _ => panic!("Visibility has no child {n}"),
        }
    }
}

#[derive(Default)]
struct VisibilityLayouter {
    child_x_offset: i32,
}

impl Layouter for VisibilityLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let Some(visibility) = widget.downcast_ref::<Visibility>() else {
            panic!("Visibility layouter attached to {}", AsAny::type_name(&*widget));
        };
        let Some(&child) = cx.children().first() else {
            return Ok(constraints.min_size());
        };

        if visibility.visible {
            self.child_x_offset = 0;
            let size = cx.layout_child(child, constraints)?;
            cx.check_overflow(child, size, constraints)?;
            return Ok(size);
        }

        self.child_x_offset = cx.backend().client_size()?.width;
        if visibility.maintain_size {
            let size = cx.layout_child(child, constraints)?;
            cx.check_overflow(child, size, constraints)?;
            Ok(size)
        } else {
            Ok(constraints.min_size())
        }
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        let offset = Point::new(self.child_x_offset, 0);
        for child in cx.children() {
            cx.position_child(child, position.offset(offset))?;
        }
        Ok(())
    }
}
