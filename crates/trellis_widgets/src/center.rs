//! Centering container

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

/// Centers its child inside itself.
///
/// On each axis the box either fills the incoming maximum (no factor) or
/// is the child's extent scaled by a percentage factor of at least 100.
#[derive(Clone, Default)]
pub struct Center {
    id: Option<WidgetId>,
    child: Option<WidgetRef>,
    width_factor: Option<u32>,
    height_factor: Option<u32>,
}

impl Center {
    pub fn new() -> Self {
        Self::default()
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

    /// Width as a percentage of the child's width.
    ///
    /// # Panics
    ///
    /// If `percent` is below 100.
    pub fn width_factor(mut self, percent: u32) -> Self {
        assert!(percent >= 100, "Center width factor must be at least 100, got {percent}");
        self.width_factor = Some(percent);
        self
    }

    /// Height as a percentage of the child's height.
    ///
    /// # Panics
    ///
    /// If `percent` is below 100.
    pub fn height_factor(mut self, percent: u32) -> Self {
        assert!(percent >= 100, "Center height factor must be at least 100, got {percent}");
        self.height_factor = Some(percent);
        self
    }
}

impl Widget for Center {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(CenterLayouter::default()))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for Center {
    fn num_children(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child(&self, n: usize) -> WidgetRef {
        match (&self.child, n) {
            (Some(child), 0) => child.clone(),
            _ => panic!("Center has no child {n}"),
        }
    }
}

fn extent(factor: Option<u32>, child: i32, min: i32, max: i32) -> i32 {
    match factor {
        None => max,
        Some(percent) => {
            let scaled = i64::from(child) * i64::from(percent) / 100;
            trellis_core::clamp(scaled.min(i64::from(i32::MAX)) as i32, min, max)
        }
    }
}

#[derive(Default)]
struct CenterLayouter {
    child_offset: Point,
}

impl Layouter for CenterLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let Some(center) = widget.downcast_ref::<Center>() else {
            panic!("Center layouter attached to {}", AsAny::type_name(&*widget));
        };

        let mut child_size = Size::ZERO;
        if let Some(&child) = cx.children().first() {
            child_size = cx.layout_child(child, constraints)?;
            cx.check_overflow(child, child_size, constraints)?;
        }

        let size = Size::new(
            extent(
                center.width_factor,
                child_size.width,
                constraints.min_width,
                constraints.max_width,
            ),
            extent(
                center.height_factor,
                child_size.height,
                constraints.min_height,
                constraints.max_height,
            ),
        );
        self.child_offset = Point::new(
            (size.width - child_size.width) / 2,
            (size.height - child_size.height) / 2,
        );
        Ok(size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        for child in cx.children() {
            cx.position_child(child, position.offset(self.child_offset))?;
        }
        Ok(())
    }

    /// Filling both axes makes the size a function of the constraints only
    fn sizing_independent_of_children(&self, widget: &dyn Widget) -> bool {
        widget
            .downcast_ref::<Center>()
            .is_some_and(|c| c.width_factor.is_none() && c.height_factor.is_none())
    }
}
