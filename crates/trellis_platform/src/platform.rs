//! Platform trait and abstraction

use crate::backend::NativeBackend;
use crate::error::PlatformError;
use crate::window::WindowConfig;

/// Platform abstraction trait
///
/// Implemented by each native binding to open windows. Every window gets
/// its own [`NativeBackend`] through which its controls are managed.
pub trait Platform {
    /// Get the platform name
    ///
    /// Returns a string like "win32", "gtk", or "headless".
    fn name(&self) -> &'static str;

    /// Open a window and return the backend bound to it
    fn open_window(&mut self, config: &WindowConfig)
        -> Result<Box<dyn NativeBackend>, PlatformError>;
}
