//! Trellis Engine
//!
//! Retained-mode reconciliation and constraint layout over native controls.
//!
//! Application code describes the UI as an immutable tree of [`Widget`]s.
//! The engine keeps three trees in step:
//!
//! - **widgets** - disposable descriptions, rebuilt freely
//! - **elements** - the persistent mirror of the widget tree, owning native
//!   controls and [`State`]
//! - **layouters** - a sparse projection of the elements that carry
//!   geometry
//!
//! Rebuilding a widget tree and calling [`ElementTree::update`] reconciles
//! it against the live elements, reusing every element whose widget still
//! matches by [`WidgetId`] and type. Layout runs in two passes, measure
//! under [`Constraints`](trellis_core::Constraints) then position, and a
//! state update replays the nearest child-independent ancestor instead of
//! laying out the whole window.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use trellis_layout::prelude::*;
//!
//! let mut tree = ElementTree::new(backend, TreeOptions::default());
//! tree.mount(Rc::new(Column::new().child(Button::new("OK"))))?;
//! tree.layout_window()?;
//!
//! tree.update(Rc::new(Column::new().child(Button::new("Cancel"))))?;
//! tree.layout_window()?;
//! ```

pub mod debug;
pub mod diff;
pub mod error;
pub mod key;
pub mod layouter;
pub mod poster;
pub mod stateful;
pub mod tree;
pub mod widget;

#[cfg(test)]
mod testing;

// Core types
pub use debug::{DebugLayouter, HighlightBatch};
pub use error::{OverflowError, Result, UiError, WidgetDescriptor};
pub use key::WidgetId;
pub use layouter::{check_overflow, LayoutCx, Layouter};
pub use poster::{Poster, Task};
pub use stateful::{stateful, stateless, FnState, State, StateHandle, StatefulFn, StatelessFn};
pub use tree::{ElementId, ElementTree, LayouterId, TreeOptions};
pub use widget::{
    widget_match, AsAny, BuildCx, Container, ElementHooks, ElementParts, NativeControl,
    StatefulWidget, StatelessWidget, Widget, WidgetKind, WidgetRef,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Result, UiError};
    pub use crate::key::WidgetId;
    pub use crate::layouter::{LayoutCx, Layouter};
    pub use crate::stateful::{stateful, stateless, FnState, State, StateHandle};
    pub use crate::tree::{ElementId, ElementTree, LayouterId, TreeOptions};
    pub use crate::widget::{
        AsAny, BuildCx, Container, ElementHooks, ElementParts, NativeControl, StatefulWidget,
        StatelessWidget, Widget, WidgetKind, WidgetRef,
    };
}
