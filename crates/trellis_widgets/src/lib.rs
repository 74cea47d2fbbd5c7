//! Trellis Widget Library
//!
//! Concrete widgets built on the `trellis_layout` contracts.
//!
//! # Containers
//!
//! - [`Column`] / [`Row`]: stack children along a main axis, with
//!   [`Expanded`] children sharing the space left over
//! - [`SizedBox`]: a fixed size forced onto its child
//! - [`Center`]: centers its child, filling or scaling around it
//! - [`Padding`]: insets its child
//! - [`Visibility`]: hides a child without destroying it
//!
//! # Native controls
//!
//! - [`Button`]: a push button whose clicks run as posted tasks
//! - [`Label`]: static text
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use trellis_widgets::prelude::*;
//!
//! let root = Column::new()
//!     .main_axis_size(MainAxisSize::Min)
//!     .child(Label::new("Name"))
//!     .child(Padding::all(4).child(Button::new("Save")));
//! tree.update(Rc::new(root))?;
//! tree.layout_window()?;
//! ```

pub mod button;
pub mod center;
pub mod expanded;
pub mod flex;
pub mod label;
pub mod padding;
pub mod sized_box;
pub mod visibility;

mod text;


pub use button::{Button, ClickHandler, DEFAULT_BUTTON_PADDING};
pub use center::Center;
pub use expanded::Expanded;
pub use flex::{Axis, Column, CrossAxisAlignment, MainAxisSize, Row};
pub use label::Label;
pub use padding::Padding;
pub use sized_box::SizedBox;
pub use visibility::Visibility;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::button::Button;
    pub use crate::center::Center;
    pub use crate::expanded::Expanded;
    pub use crate::flex::{Column, CrossAxisAlignment, MainAxisSize, Row};
    pub use crate::label::Label;
    pub use crate::padding::Padding;
    pub use crate::sized_box::SizedBox;
    pub use crate::visibility::Visibility;
    pub use trellis_layout::prelude::*;
}
