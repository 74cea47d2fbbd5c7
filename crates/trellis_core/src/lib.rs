//! Trellis Core
//!
//! Geometry primitives shared by every Trellis crate:
//!
//! - [`Size`] and [`Point`] in integer device pixels
//! - [`Rect`] for debug outlines and invalidation regions
//! - [`Constraints`], the min/max box a layouter must size itself within
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Constraints, Size};
//!
//! let c = Constraints::new(0, 0, 300, 200);
//! assert_eq!(c.clamp(Size::new(500, 40)), Size::new(300, 40));
//! assert!(Constraints::unbounded().is_unbounded_height());
//! ```

pub mod geometry;

pub use geometry::{clamp, Constraints, Point, Rect, Size, INFINITY};
