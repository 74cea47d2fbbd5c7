//! Native push button

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::{ControlKind, NativeBackend, NativeHandle, PlatformError};

use crate::text::intrinsic_size;

/// Space added around the label when no padding is given
pub const DEFAULT_BUTTON_PADDING: Size = Size::new(15, 10);

/// Click handler, run as a posted task on the element tree
pub type ClickHandler = Rc<dyn Fn(&mut ElementTree) -> Result<()>>;

/// A native push button
///
/// Clicks are not handled inside the native callback. The callback posts
/// the handler to the tree's [`Poster`](trellis_layout::Poster) and the
/// event loop runs it with the tree borrowed mutably, so a handler can
/// update state:
///
/// ```ignore
/// Button::new("+1").on_click(move |tree| {
///     tree.update_state::<Counter>(handle, |c| c.count += 1)
/// })
/// ```
#[derive(Clone)]
pub struct Button {
    id: Option<WidgetId>,
    label: String,
    padding: Option<Size>,
    on_click: Option<ClickHandler>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            padding: None,
            on_click: None,
        }
    }

    pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Space around the label, [`DEFAULT_BUTTON_PADDING`] when unset
    pub fn padding(mut self, width: i32, height: i32) -> Self {
        self.padding = Some(Size::new(width, height));
        self
    }

    pub fn on_click(mut self, handler: impl Fn(&mut ElementTree) -> Result<()> + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn effective_padding(&self) -> Size {
        self.padding.unwrap_or(DEFAULT_BUTTON_PADDING)
    }
}

impl Widget for Button {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        let handle = cx.backend().create_control(ControlKind::Button, &self.label)?;

        // The native callback stays registered for the control's lifetime;
        // rebuilds only swap the handler in this slot.
        let slot = Rc::new(RefCell::new(self.on_click.clone()));
        let listener = slot.clone();
        let poster = cx.poster().clone();
        let callback = Box::new(move || {
            let handler = listener.borrow().clone();
            if let Some(handler) = handler {
                poster.post(move |tree| handler(tree));
            }
        });
        if let Err(err) = cx.backend().set_on_click(handle, callback) {
            let _ = cx.backend().destroy_control(handle);
            return Err(err);
        }

        Ok(ElementParts::new()
            .with_hooks(ButtonHooks {
                control: NativeControl::new(handle),
                on_click: slot,
            })
            .with_layouter(ButtonLayouter { handle }))
    }
}

struct ButtonHooks {
    control: NativeControl,
    on_click: Rc<RefCell<Option<ClickHandler>>>,
}

impl ElementHooks for ButtonHooks {
    fn native_handle(&self) -> Option<NativeHandle> {
        Some(self.control.handle())
    }

    fn set_widget(
        &mut self,
        cx: &mut BuildCx<'_>,
        old: &dyn Widget,
        new: &dyn Widget,
    ) -> std::result::Result<(), PlatformError> {
        let (Some(old), Some(new)) = (old.downcast_ref::<Button>(), new.downcast_ref::<Button>())
        else {
            return Ok(());
        };
        if old.label != new.label {
            cx.backend().set_text(self.control.handle(), &new.label)?;
        }
        *self.on_click.borrow_mut() = new.on_click.clone();
        Ok(())
    }

    fn destroy(&mut self, backend: &mut dyn NativeBackend) -> std::result::Result<(), PlatformError> {
        self.on_click.borrow_mut().take();
        self.control.destroy(backend)
    }
}

struct ButtonLayouter {
    handle: NativeHandle,
}

impl Layouter for ButtonLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let Some(button) = widget.downcast_ref::<Button>() else {
            panic!("Button layouter attached to {}", AsAny::type_name(&*widget));
        };
        let size = intrinsic_size(
            cx.backend(),
            self.handle,
            &button.label,
            button.effective_padding(),
            constraints,
        )?;
        cx.backend().set_size(self.handle, size)?;
        Ok(size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        cx.backend().set_position(self.handle, position)?;
        Ok(())
    }
}
