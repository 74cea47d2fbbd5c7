//! Native backend contract
//!
//! The engine never talks to a windowing system directly. Everything it
//! needs from the platform goes through [`NativeBackend`]: creating and
//! destroying controls, moving and resizing them, measuring their content,
//! wiring input callbacks, and invalidating the window for redraw.
//!
//! A backend instance is bound to one window. All calls happen on the UI
//! thread that owns that window.

use trellis_core::{Point, Rect, Size};

use crate::error::Result;

/// Opaque handle to a native control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Create a handle from the backend's raw representation
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Convert to the backend's raw representation
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Kinds of native controls the engine's leaf widgets create
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Push button with a text label
    Button,
    /// Static text
    Label,
}

/// Callback invoked by the backend when a control receives input
///
/// Callbacks run on the UI thread but outside of any tree operation, so they
/// must not touch the element tree directly. Post work instead.
pub type InputCallback = Box<dyn Fn()>;

/// Outline of a layouter, used by the layout debug overlay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugRect {
    pub rect: Rect,
    /// Whether the outline was touched by the most recent layout pass
    pub highlight: bool,
}

/// Operations a native platform binding exposes to the engine
///
/// Every fallible operation returns a typed error. The engine never assumes
/// success.
pub trait NativeBackend {
    /// Create a control of the given kind with its initial text
    fn create_control(&mut self, kind: ControlKind, text: &str) -> Result<NativeHandle>;

    /// Destroy a control and release its native resources
    fn destroy_control(&mut self, handle: NativeHandle) -> Result<()>;

    /// Replace a control's text (button label, label text)
    fn set_text(&mut self, handle: NativeHandle, text: &str) -> Result<()>;

    /// Move a control, keeping its size
    fn set_position(&mut self, handle: NativeHandle, position: Point) -> Result<()>;

    /// Resize a control, keeping its position
    fn set_size(&mut self, handle: NativeHandle, size: Size) -> Result<()>;

    /// Move and resize a control in one call
    fn set_geometry(&mut self, handle: NativeHandle, position: Point, size: Size) -> Result<()> {
        self.set_position(handle, position)?;
        self.set_size(handle, size)
    }

    /// Current geometry of a control
    fn geometry(&self, handle: NativeHandle) -> Result<Rect>;

    /// Minimum size needed to show `text` in the control, without padding
    fn measure(&self, handle: NativeHandle, text: &str) -> Result<Size>;

    /// Replace the click callback of a control
    fn set_on_click(&mut self, handle: NativeHandle, callback: InputCallback) -> Result<()>;

    /// Size of the window's client area
    fn client_size(&self) -> Result<Size>;

    /// Request a redraw of `region`, or of the whole window when `None`
    fn invalidate(&mut self, region: Option<Rect>) -> Result<()>;
}
