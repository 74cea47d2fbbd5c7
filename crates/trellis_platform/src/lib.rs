//! Trellis Platform Abstraction Layer
//!
//! This crate defines what the layout engine needs from a native windowing
//! toolkit, and nothing more.
//!
//! # Architecture
//!
//! - [`Platform`] - Opens windows
//! - [`NativeBackend`] - Per-window control management: create, destroy,
//!   geometry, text measurement, input callbacks, invalidation
//!
//! # Backends
//!
//! - [`HeadlessBackend`] - In-memory backend that records every call, used
//!   for tests and for running widget trees without a display
//!
//! # Example
//!
//! ```
//! use trellis_core::Size;
//! use trellis_platform::{ControlKind, HeadlessBackend, NativeBackend};
//!
//! let mut backend = HeadlessBackend::new(Size::new(800, 600));
//! let handle = backend.create_control(ControlKind::Button, "OK").unwrap();
//! assert_eq!(backend.text(handle).as_deref(), Some("OK"));
//! ```

mod backend;
mod error;
mod headless;
mod platform;
mod window;

// Re-export all public types
pub use backend::{ControlKind, DebugRect, InputCallback, NativeBackend, NativeHandle};
pub use error::{PlatformError, Result};
pub use headless::{BackendCall, HeadlessBackend, HeadlessPlatform, CHAR_WIDTH, LINE_HEIGHT};
pub use platform::Platform;
pub use window::WindowConfig;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{ControlKind, DebugRect, InputCallback, NativeBackend, NativeHandle};
    pub use crate::error::{PlatformError, Result};
    pub use crate::platform::Platform;
    pub use crate::window::WindowConfig;
}
