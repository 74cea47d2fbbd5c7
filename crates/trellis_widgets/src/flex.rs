//! Column and Row
//!
//! Both containers place their children one after another along a main
//! axis and align them on the cross axis. They share one layouter,
//! parameterised by [`Axis`].
//!
//! Sizing on the main axis follows [`MainAxisSize`]: `Min` wraps the
//! children, `Max` fills the incoming maximum. The cross axis is as wide as
//! the widest child, and never narrower than the incoming minimum.
//!
//! Children are laid out in two rounds. Regular children go first, each
//! under `{0, 0, maxCross, remainingMain}`. [`Expanded`] children then
//! split the main-axis space left over, by flex weight, under tight
//! main-axis constraints.
//!
//! # Example
//!
//! ```ignore
//! let toolbar = Row::new()
//!     .cross_axis_alignment(CrossAxisAlignment::Center)
//!     .child(Button::new("Back"))
//!     .child(Expanded::new().child(Label::new("Title")))
//!     .child(Button::new("Menu"));
//! ```

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;
use trellis_core::{Constraints, Point, Size, INFINITY};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

use crate::expanded::{distribute, Expanded};

// =============================================================================
// Axes
// =============================================================================

/// Direction children are stacked in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Axis::Horizontal => Point::new(main, cross),
            Axis::Vertical => Point::new(cross, main),
        }
    }

    fn constraints(self, min_main: i32, max_main: i32, min_cross: i32, max_cross: i32) -> Constraints {
        match self {
            Axis::Horizontal => Constraints::new(min_main, min_cross, max_main, max_cross),
            Axis::Vertical => Constraints::new(min_cross, min_main, max_cross, max_main),
        }
    }

    fn min_main(self, c: &Constraints) -> i32 {
        self.main(c.min_size())
    }

    fn max_main(self, c: &Constraints) -> i32 {
        self.main(c.max_size())
    }

    fn min_cross(self, c: &Constraints) -> i32 {
        self.cross(c.min_size())
    }

    fn max_cross(self, c: &Constraints) -> i32 {
        self.cross(c.max_size())
    }
}

/// How much main-axis space a [`Column`] or [`Row`] takes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MainAxisSize {
    /// Fill the maximum allowed by the incoming constraints
    #[default]
    Max,
    /// Wrap the children, but not below the incoming minimum
    Min,
}

/// Placement of children on the cross axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossAxisAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl CrossAxisAlignment {
    fn offset(self, cross: i32, child_cross: i32) -> i32 {
        match self {
            CrossAxisAlignment::Start => 0,
            CrossAxisAlignment::Center => (cross - child_cross) / 2,
            CrossAxisAlignment::End => cross - child_cross,
        }
    }
}

// =============================================================================
// Widgets
// =============================================================================

#[derive(Clone, Default)]
struct FlexProps {
    id: Option<WidgetId>,
    children: Vec<WidgetRef>,
    main_axis_size: MainAxisSize,
    cross_axis_alignment: CrossAxisAlignment,
}

macro_rules! flex_widget {
    ($(#[$meta:meta])* $name:ident, $axis:expr) => {
        $(#[$meta])*
        #[derive(Clone, Default)]
        pub struct $name {
            props: FlexProps,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
                self.props.id = Some(id.into());
                self
            }

            /// Append a child
            pub fn child(mut self, child: impl Widget) -> Self {
                self.props.children.push(Rc::new(child));
                self
            }

            /// Append already shared children
            pub fn children(mut self, children: impl IntoIterator<Item = WidgetRef>) -> Self {
                self.props.children.extend(children);
                self
            }

            pub fn main_axis_size(mut self, size: MainAxisSize) -> Self {
                self.props.main_axis_size = size;
                self
            }

            pub fn cross_axis_alignment(mut self, alignment: CrossAxisAlignment) -> Self {
                self.props.cross_axis_alignment = alignment;
                self
            }
        }

        impl Widget for $name {
            fn widget_id(&self) -> Option<&WidgetId> {
                self.props.id.as_ref()
            }

            fn create_element(
                &self,
                _cx: &mut BuildCx<'_>,
            ) -> std::result::Result<ElementParts, PlatformError> {
                Ok(ElementParts::new().with_layouter(FlexLayouter::new($axis)))
            }

            fn kind(&self) -> WidgetKind<'_> {
                WidgetKind::Container(self)
            }
        }

        impl Container for $name {
            fn num_children(&self) -> usize {
                self.props.children.len()
            }

            fn child(&self, n: usize) -> WidgetRef {
                self.props.children[n].clone()
            }
        }
    };
}

flex_widget!(
    /// Stacks its children vertically
    Column,
    Axis::Vertical
);

flex_widget!(
    /// Lines its children up horizontally
    Row,
    Axis::Horizontal
);

fn props_of(widget: &dyn Widget) -> &FlexProps {
    if let Some(column) = widget.downcast_ref::<Column>() {
        return &column.props;
    }
    match widget.downcast_ref::<Row>() {
        Some(row) => &row.props,
        None => panic!("flex layouter attached to a non-flex widget"),
    }
}

// =============================================================================
// Layouter
// =============================================================================

struct FlexLayouter {
    axis: Axis,
    offsets: Vec<Point>,
}

impl FlexLayouter {
    fn new(axis: Axis) -> Self {
        Self {
            axis,
            offsets: Vec::new(),
        }
    }
}

impl Layouter for FlexLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let axis = self.axis;
        let widget = cx.widget();
        let props = props_of(&*widget);
        let children = cx.children();

        let max_main = axis.max_main(&constraints);
        let max_cross = axis.max_cross(&constraints);
        let unbounded = max_main == INFINITY;

        let mut sizes: SmallVec<[Size; 8]> = SmallVec::from_elem(Size::ZERO, children.len());
        let mut flexible: SmallVec<[(usize, i32); 4]> = SmallVec::new();
        let mut used = 0i32;
        let mut cross = 0i32;

        for (i, &child) in children.iter().enumerate() {
            if let Some(expanded) = cx.child_widget(child).downcast_ref::<Expanded>() {
                flexible.push((i, expanded.weight()));
                continue;
            }
            let remaining = if unbounded {
                INFINITY
            } else {
                (max_main - used).max(0)
            };
            let child_constraints = axis.constraints(0, remaining, 0, max_cross);
            let size = cx.layout_child(child, child_constraints)?;
            cx.check_overflow(child, size, child_constraints)?;
            used = used.saturating_add(axis.main(size));
            cross = cross.max(axis.cross(size));
            sizes[i] = size;
        }

        if !flexible.is_empty() {
            // No finite space to share along an unbounded axis.
            let available = if unbounded { 0 } else { (max_main - used).max(0) };
            let shares = distribute(available, flexible.iter().map(|&(_, flex)| flex));
            trace!(available, ?shares, "distributing flex space");
            for (&(i, _), share) in flexible.iter().zip(shares) {
                let child = children[i];
                let child_constraints = match share {
                    Some(share) => axis.constraints(share, share, 0, max_cross),
                    None => Constraints::default(),
                };
                let size = cx.layout_child(child, child_constraints)?;
                cx.check_overflow(child, size, child_constraints)?;
                used = used.saturating_add(axis.main(size));
                cross = cross.max(axis.cross(size));
                sizes[i] = size;
            }
        }

        cross = cross.max(axis.min_cross(&constraints));
        let main = match props.main_axis_size {
            MainAxisSize::Min => used.max(axis.min_main(&constraints)),
            MainAxisSize::Max => max_main,
        };

        self.offsets.clear();
        let mut cursor = 0i32;
        for size in &sizes {
            let child_cross = props.cross_axis_alignment.offset(cross, axis.cross(*size));
            self.offsets.push(axis.point(cursor, child_cross));
            cursor = cursor.saturating_add(axis.main(*size));
        }

        Ok(axis.size(main, cross))
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        for (child, offset) in cx.children().into_iter().zip(self.offsets.clone()) {
            cx.position_child(child, position.offset(offset))?;
        }
        Ok(())
    }
}
