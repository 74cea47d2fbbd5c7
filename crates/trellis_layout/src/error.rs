//! Engine error types

use std::fmt;

use thiserror::Error;
use trellis_core::{Constraints, Size};
use trellis_platform::PlatformError;

use crate::key::WidgetId;
use crate::widget::Widget;

/// Printable identification of a widget, detached from the widget itself
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetDescriptor {
    /// Concrete type name of the widget
    pub type_name: &'static str,
    /// The widget's id, if it has one
    pub id: Option<WidgetId>,
}

impl WidgetDescriptor {
    pub fn of(widget: &dyn Widget) -> Self {
        Self {
            type_name: widget.type_name(),
            id: widget.widget_id().cloned(),
        }
    }
}

impl fmt::Display for WidgetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.type_name.rsplit("::").next().unwrap_or(self.type_name);
        match &self.id {
            Some(id) => write!(f, "{name}(id={id})"),
            None => write!(f, "{name}"),
        }
    }
}

/// A child layouter returned a size outside the constraints it was given
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{widget} overflowed: size {size} outside {constraints}")]
pub struct OverflowError {
    pub widget: WidgetDescriptor,
    pub size: Size,
    pub constraints: Constraints,
}

/// Errors surfaced by build, reconcile and layout
#[derive(Error, Debug)]
pub enum UiError {
    /// The native backend failed
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A layouter overflowed its constraints
    #[error("Layout overflow: {0}")]
    Overflow(#[from] OverflowError),

    /// The state handle names an element that has been destroyed
    #[error("State handle refers to a destroyed element")]
    StaleState,

    /// The state update closure expects a different state type
    #[error("State type mismatch: expected {expected}, found {found}")]
    StateType {
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, UiError>;
