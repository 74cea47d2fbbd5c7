//! Sizes, points, rectangles and layout constraints
//!
//! All geometry is expressed in integer device pixels, which is what native
//! controls are positioned in. [`INFINITY`] is the reserved sentinel for an
//! unbounded axis.

use std::fmt;

/// Sentinel value meaning "no upper bound" on an axis.
pub const INFINITY: i32 = i32::MAX;

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`i32::clamp`] this never panics: when `min > max` the result is
/// `max`, matching how layouters treat a degenerate constraint box.
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min.min(max)
    } else if value > max {
        max
    } else {
        value
    }
}

/// A width and height pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{width: {}, height: {}}}", self.width, self.height)
    }
}

/// An absolute or relative position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `delta`, saturating at the pixel range limits.
    pub fn offset(self, delta: Point) -> Point {
        Point {
            x: self.x.saturating_add(delta.x),
            y: self.y.saturating_add(delta.y),
        }
    }
}

/// Edge-based rectangle (left/top inclusive, right/bottom exclusive)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from its top-left corner and size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(size.width),
            bottom: origin.y.saturating_add(size.height),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Layout constraints handed from a parent layouter to a child
///
/// A layouter must return a size inside `[min, max]` on both axes. A max of
/// [`INFINITY`] leaves that axis unbounded. Outside the sentinel case
/// `min <= max` holds on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Constraints {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Constraints {
    /// Create constraints from explicit bounds.
    pub fn new(min_width: i32, min_height: i32, max_width: i32, max_height: i32) -> Self {
        debug_assert!(
            min_width <= max_width && min_height <= max_height,
            "constraints min exceeds max: {min_width}x{min_height} .. {max_width}x{max_height}"
        );
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Constraints that admit exactly `size`.
    pub fn tight(size: Size) -> Self {
        Self::new(size.width, size.height, size.width, size.height)
    }

    /// Constraints from zero up to `size`.
    pub fn loose(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Constraints with no upper bound on either axis.
    pub fn unbounded() -> Self {
        Self::new(0, 0, INFINITY, INFINITY)
    }

    /// True if width has a finite, equal min and max.
    pub fn is_tight_width(&self) -> bool {
        self.min_width == self.max_width && self.min_width != INFINITY
    }

    /// True if height has a finite, equal min and max.
    pub fn is_tight_height(&self) -> bool {
        self.min_height == self.max_height && self.min_height != INFINITY
    }

    pub fn is_tight(&self) -> bool {
        self.is_tight_width() && self.is_tight_height()
    }

    /// True if no maximum is imposed on width.
    pub fn is_unbounded_width(&self) -> bool {
        self.max_width == INFINITY
    }

    /// True if no maximum is imposed on height.
    pub fn is_unbounded_height(&self) -> bool {
        self.max_height == INFINITY
    }

    pub fn clamp_width(&self, width: i32) -> i32 {
        clamp(width, self.min_width, self.max_width)
    }

    pub fn clamp_height(&self, height: i32) -> i32 {
        clamp(height, self.min_height, self.max_height)
    }

    /// Clamp `size` into these constraints on both axes.
    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: self.clamp_width(size.width),
            height: self.clamp_height(size.height),
        }
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn max_size(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }

    /// True if `size` lies within `[min, max]` on both axes.
    pub fn contains(&self, size: Size) -> bool {
        size.width >= self.min_width
            && size.width <= self.max_width
            && size.height >= self.min_height
            && size.height <= self.max_height
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |v: i32| {
            if v == INFINITY {
                "inf".to_string()
            } else {
                v.to_string()
            }
        };
        write!(
            f,
            "{{min_width: {}, min_height: {}, max_width: {}, max_height: {}}}",
            self.min_width,
            self.min_height,
            bound(self.max_width),
            bound(self.max_height)
        )
    }
}
