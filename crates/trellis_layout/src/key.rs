//! Widget identity keys.
//!
//! A [`WidgetId`] is the only identity signal the reconciler has besides a
//! widget's concrete type. Siblings with equal ids and types are treated as
//! the same logical node across rebuilds, so their elements, native controls
//! and state survive.
//!
//! # Example
//!
//! ```
//! use trellis_layout::WidgetId;
//!
//! // Deterministic ids, stable between rebuilds
//! assert_eq!(WidgetId::from(3), WidgetId::from(3));
//! assert_eq!(WidgetId::from("save"), WidgetId::from("save"));
//!
//! // A fresh id never equals another one, so the widget is rebuilt every time
//! assert_ne!(WidgetId::unique(), WidgetId::unique());
//! ```

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Opaque, comparable identity token for a widget
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WidgetId(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Int(i64),
    Str(Arc<str>),
    Unique(Uuid),
}

impl WidgetId {
    /// Generate an id that is different from every other id.
    ///
    /// Useful to force a subtree to be rebuilt from scratch on every
    /// reconciliation.
    pub fn unique() -> Self {
        Self(Repr::Unique(Uuid::new_v4()))
    }

    /// The integer value, if this id was created from one
    pub fn as_int(&self) -> Option<i64> {
        match self.0 {
            Repr::Int(v) => Some(v),
            _ => None,
        }
    }

    /// The string value, if this id was created from one
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Repr::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for WidgetId {
    fn from(value: i64) -> Self {
        Self(Repr::Int(value))
    }
}

impl From<i32> for WidgetId {
    fn from(value: i32) -> Self {
        Self(Repr::Int(value.into()))
    }
}

impl From<u32> for WidgetId {
    fn from(value: u32) -> Self {
        Self(Repr::Int(value.into()))
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(Repr::Str(Arc::from(value)))
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(Repr::Str(Arc::from(value)))
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Int(v) => write!(f, "{v}"),
            Repr::Str(s) => write!(f, "{s:?}"),
            Repr::Unique(u) => write!(f, "#{}", u.as_simple()),
        }
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({self})")
    }
}
