//! Headless backend
//!
//! A [`NativeBackend`] with no windowing system behind it. Controls live in
//! an in-memory table and every call is appended to a log, so tests can
//! assert exactly which native operations the engine performed.
//!
//! [`HeadlessBackend`] is a cheap handle over shared state: keep a clone as
//! a probe after moving the original into an element tree.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use trellis_core::{Point, Rect, Size};

use crate::backend::{ControlKind, InputCallback, NativeBackend, NativeHandle};
use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::window::WindowConfig;

/// Width of one character in the default text metrics
pub const CHAR_WIDTH: i32 = 8;
/// Line height in the default text metrics
pub const LINE_HEIGHT: i32 = 16;

/// One recorded backend operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendCall {
    Create {
        handle: NativeHandle,
        kind: ControlKind,
        text: String,
    },
    Destroy(NativeHandle),
    SetText {
        handle: NativeHandle,
        text: String,
    },
    SetPosition {
        handle: NativeHandle,
        position: Point,
    },
    SetSize {
        handle: NativeHandle,
        size: Size,
    },
    Measure(NativeHandle),
    SetOnClick(NativeHandle),
    Invalidate(Option<Rect>),
}

struct Control {
    kind: ControlKind,
    text: String,
    position: Point,
    size: Size,
    on_click: Option<Rc<dyn Fn()>>,
}

struct HeadlessState {
    next_handle: u64,
    client_size: Size,
    controls: FxHashMap<NativeHandle, Control>,
    calls: Vec<BackendCall>,
    text_sizes: FxHashMap<String, Size>,
    fail_next_create: Option<String>,
}

impl HeadlessState {
    fn control_mut(&mut self, handle: NativeHandle) -> Result<&mut Control> {
        self.controls
            .get_mut(&handle)
            .ok_or(PlatformError::UnknownControl(handle))
    }
}

/// In-memory, call-recording native backend
#[derive(Clone)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    /// Create a backend whose window client area is `client_size`
    pub fn new(client_size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                next_handle: 1,
                client_size,
                controls: FxHashMap::default(),
                calls: Vec::new(),
                text_sizes: FxHashMap::default(),
                fail_next_create: None,
            })),
        }
    }

    /// Boxed clone, ready to hand to an element tree
    pub fn boxed(&self) -> Box<dyn NativeBackend> {
        Box::new(self.clone())
    }

    /// Report `size` as the measured content size of any control showing `text`
    pub fn set_text_size(&self, text: impl Into<String>, size: Size) {
        self.state.borrow_mut().text_sizes.insert(text.into(), size);
    }

    /// Change the window client area
    pub fn set_client_size(&self, size: Size) {
        self.state.borrow_mut().client_size = size;
    }

    /// Make the next `create_control` call fail with `message`
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.state.borrow_mut().fail_next_create = Some(message.into());
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget the recorded calls
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of controls currently alive
    pub fn live_controls(&self) -> usize {
        self.state.borrow().controls.len()
    }

    /// Whether `handle` names a live control
    pub fn is_alive(&self, handle: NativeHandle) -> bool {
        self.state.borrow().controls.contains_key(&handle)
    }

    /// Current text of a control
    pub fn text(&self, handle: NativeHandle) -> Option<String> {
        self.state
            .borrow()
            .controls
            .get(&handle)
            .map(|c| c.text.clone())
    }

    /// Kind of a control
    pub fn kind(&self, handle: NativeHandle) -> Option<ControlKind> {
        self.state.borrow().controls.get(&handle).map(|c| c.kind)
    }

    /// Current geometry of a control
    pub fn rect(&self, handle: NativeHandle) -> Option<Rect> {
        self.state
            .borrow()
            .controls
            .get(&handle)
            .map(|c| Rect::from_origin_size(c.position, c.size))
    }

    /// Handle of the live control showing `text`, if exactly one does
    pub fn find_by_text(&self, text: &str) -> Option<NativeHandle> {
        let state = self.state.borrow();
        let mut found = state
            .controls
            .iter()
            .filter(|(_, c)| c.text == text)
            .map(|(h, _)| *h);
        let first = found.next()?;
        found.next().is_none().then_some(first)
    }

    /// Simulate a click on a control; returns false if nothing was listening
    pub fn click(&self, handle: NativeHandle) -> bool {
        let callback = self
            .state
            .borrow()
            .controls
            .get(&handle)
            .and_then(|c| c.on_click.clone());
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn record(&self, call: BackendCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl std::fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessBackend")
            .field("client_size", &state.client_size)
            .field("controls", &state.controls.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}

impl NativeBackend for HeadlessBackend {
    fn create_control(&mut self, kind: ControlKind, text: &str) -> Result<NativeHandle> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.fail_next_create.take() {
            return Err(PlatformError::ControlCreation(message));
        }
        let handle = NativeHandle::from_raw(state.next_handle);
        state.next_handle += 1;
        state.controls.insert(
            handle,
            Control {
                kind,
                text: text.to_string(),
                position: Point::ORIGIN,
                size: Size::ZERO,
                on_click: None,
            },
        );
        state.calls.push(BackendCall::Create {
            handle,
            kind,
            text: text.to_string(),
        });
        Ok(handle)
    }

    fn destroy_control(&mut self, handle: NativeHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .controls
            .remove(&handle)
            .ok_or(PlatformError::UnknownControl(handle))?;
        state.calls.push(BackendCall::Destroy(handle));
        Ok(())
    }

    fn set_text(&mut self, handle: NativeHandle, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.control_mut(handle)?.text = text.to_string();
        state.calls.push(BackendCall::SetText {
            handle,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_position(&mut self, handle: NativeHandle, position: Point) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.control_mut(handle)?.position = position;
        state
            .calls
            .push(BackendCall::SetPosition { handle, position });
        Ok(())
    }

    fn set_size(&mut self, handle: NativeHandle, size: Size) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.control_mut(handle)?.size = size;
        state.calls.push(BackendCall::SetSize { handle, size });
        Ok(())
    }

    fn geometry(&self, handle: NativeHandle) -> Result<Rect> {
        self.rect(handle).ok_or(PlatformError::UnknownControl(handle))
    }

    fn measure(&self, handle: NativeHandle, text: &str) -> Result<Size> {
        if !self.is_alive(handle) {
            return Err(PlatformError::UnknownControl(handle));
        }
        self.record(BackendCall::Measure(handle));
        let state = self.state.borrow();
        Ok(state.text_sizes.get(text).copied().unwrap_or_else(|| {
            Size::new(text.chars().count() as i32 * CHAR_WIDTH, LINE_HEIGHT)
        }))
    }

    fn set_on_click(&mut self, handle: NativeHandle, callback: InputCallback) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.control_mut(handle)?.on_click = Some(Rc::from(callback));
        state.calls.push(BackendCall::SetOnClick(handle));
        Ok(())
    }

    fn client_size(&self) -> Result<Size> {
        Ok(self.state.borrow().client_size)
    }

    fn invalidate(&mut self, region: Option<Rect>) -> Result<()> {
        self.record(BackendCall::Invalidate(region));
        Ok(())
    }
}

/// Platform that opens [`HeadlessBackend`] windows
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    windows: Vec<HeadlessBackend>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe handles for every window opened so far, in opening order
    pub fn windows(&self) -> &[HeadlessBackend] {
        &self.windows
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn open_window(&mut self, config: &WindowConfig) -> Result<Box<dyn NativeBackend>> {
        let width = i32::try_from(config.width)
            .map_err(|_| PlatformError::WindowCreation(format!("width {}", config.width)))?;
        let height = i32::try_from(config.height)
            .map_err(|_| PlatformError::WindowCreation(format!("height {}", config.height)))?;
        let backend = HeadlessBackend::new(Size::new(width, height));
        self.windows.push(backend.clone());
        Ok(backend.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_create_records_call() {
        let probe = HeadlessBackend::new(Size::new(100, 100));
        let mut backend = probe.clone();
        let handle = backend.create_control(ControlKind::Button, "OK").unwrap();
        assert!(probe.is_alive(handle));
        assert_eq!(probe.text(handle).as_deref(), Some("OK"));
        assert_eq!(
            probe.calls(),
            vec![BackendCall::Create {
                handle,
                kind: ControlKind::Button,
                text: "OK".to_string()
            }]
        );
    }

    #[test]
    fn test_fail_next_create() {
        let mut backend = HeadlessBackend::new(Size::new(100, 100));
        backend.fail_next_create("out of handles");
        let err = backend.create_control(ControlKind::Label, "x").unwrap_err();
        assert_eq!(err, PlatformError::ControlCreation("out of handles".into()));
        assert!(backend.create_control(ControlKind::Label, "x").is_ok());
    }

    #[test]
    fn test_measure_default_and_override() {
        let mut backend = HeadlessBackend::new(Size::new(100, 100));
        let handle = backend.create_control(ControlKind::Label, "abc").unwrap();
        assert_eq!(
            backend.measure(handle, "abc").unwrap(),
            Size::new(3 * CHAR_WIDTH, LINE_HEIGHT)
        );
        backend.set_text_size("abc", Size::new(100, 40));
        assert_eq!(backend.measure(handle, "abc").unwrap(), Size::new(100, 40));
    }

    #[test]
    fn test_unknown_handle_is_an_error() {
        let mut backend = HeadlessBackend::new(Size::new(100, 100));
        let handle = backend.create_control(ControlKind::Label, "x").unwrap();
        backend.destroy_control(handle).unwrap();
        assert_eq!(
            backend.set_text(handle, "y"),
            Err(PlatformError::UnknownControl(handle))
        );
        assert!(backend.destroy_control(handle).is_err());
    }

    #[test]
    fn test_click_invokes_callback() {
        let mut backend = HeadlessBackend::new(Size::new(100, 100));
        let handle = backend.create_control(ControlKind::Button, "go").unwrap();
        assert!(!backend.click(handle));

        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        backend
            .set_on_click(handle, Box::new(move || counter.set(counter.get() + 1)))
            .unwrap();
        assert!(backend.click(handle));
        assert!(backend.click(handle));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_platform_opens_sized_windows() {
        let mut platform = HeadlessPlatform::new();
        let backend = platform
            .open_window(&WindowConfig::new("w").size(640, 480))
            .unwrap();
        assert_eq!(backend.client_size().unwrap(), Size::new(640, 480));
        assert_eq!(platform.windows().len(), 1);
        assert_eq!(platform.name(), "headless");
    }
}
