//! Native static text

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::{ControlKind, NativeHandle, PlatformError};

use crate::text::intrinsic_size;

/// A single line of native static text
#[derive(Clone, Debug)]
pub struct Label {
    id: Option<WidgetId>,
    text: String,
    padding: Size,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            padding: Size::ZERO,
        }
    }

    pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn padding(mut self, width: i32, height: i32) -> Self {
        self.padding = Size::new(width, height);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for Label {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        let handle = cx.backend().create_control(ControlKind::Label, &self.text)?;
        Ok(ElementParts::new()
            .with_hooks(LabelHooks(NativeControl::new(handle)))
            .with_layouter(LabelLayouter {
                handle,
                size: Size::ZERO,
            }))
    }
}

struct LabelHooks(NativeControl);

impl ElementHooks for LabelHooks {
    fn native_handle(&self) -> Option<NativeHandle> {
        Some(self.0.handle())
    }

    fn set_widget(
        &mut self,
        cx: &mut BuildCx<'_>,
        old: &dyn Widget,
        new: &dyn Widget,
    ) -> std::result::Result<(), PlatformError> {
        let (Some(old), Some(new)) = (old.downcast_ref::<Label>(), new.downcast_ref::<Label>())
        else {
            return Ok(());
        };
        if old.text != new.text {
            cx.backend().set_text(self.0.handle(), &new.text)?;
        }
        Ok(())
    }

    fn destroy(
        &mut self,
        backend: &mut dyn trellis_platform::NativeBackend,
    ) -> std::result::Result<(), PlatformError> {
        self.0.destroy(backend)
    }
}

struct LabelLayouter {
    handle: NativeHandle,
    size: Size,
}

impl Layouter for LabelLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let widget = cx.widget();
        let Some(label) = widget.downcast_ref::<Label>() else {
            panic!("Label layouter attached to {}", AsAny::type_name(&*widget));
        };
        self.size = intrinsic_size(cx.backend(), self.handle, &label.text, label.padding, constraints)?;
        Ok(self.size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        cx.backend().set_geometry(self.handle, position, self.size)?;
        Ok(())
    }
}
