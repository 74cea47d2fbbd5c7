//! Layout debug overlay
//!
//! With [`TreeOptions::debug_layout`](crate::TreeOptions) every layouter is
//! wrapped in a [`DebugLayouter`]. The decorator delegates to the real
//! layouter and records each node's outline. Nodes touched by a layout are
//! highlighted; everything touched by one top-level layout call forms a
//! [`HighlightBatch`] that the event loop cancels after a short delay.

use std::mem;

use slotmap::SecondaryMap;
use trellis_core::{Constraints, Point, Rect, Size};
use trellis_platform::DebugRect;

use crate::error::Result;
use crate::layouter::{LayoutCx, Layouter};
use crate::tree::{ElementTree, LayouterId};
use crate::widget::Widget;

#[derive(Clone, Copy, Debug, Default)]
struct Outline {
    size: Size,
    position: Point,
    highlight: bool,
    version: u64,
}

/// Nodes highlighted by one top-level layout call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightBatch {
    entries: Vec<(LayouterId, u64)>,
}

impl HighlightBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
pub(crate) struct DebugOverlay {
    outlines: SecondaryMap<LayouterId, Outline>,
    depth: usize,
    version: u64,
    active: Vec<(LayouterId, u64)>,
    ready: Vec<HighlightBatch>,
}

impl DebugOverlay {
    pub(crate) fn forget(&mut self, id: LayouterId) {
        self.outlines.remove(id);
    }

    fn mark_layout(&mut self, id: LayouterId, size: Size) {
        self.version += 1;
        let version = self.version;
        if let Some(entry) = self.outlines.entry(id) {
            let outline = entry.or_default();
            outline.size = size;
            outline.highlight = true;
            outline.version = version;
            self.active.push((id, version));
        }
    }

    fn mark_position(&mut self, id: LayouterId, position: Point) {
        if let Some(entry) = self.outlines.entry(id) {
            entry.or_default().position = position;
        }
    }
}

/// Decorator recording layout activity for the debug overlay
pub struct DebugLayouter {
    inner: Box<dyn Layouter>,
}

impl DebugLayouter {
    pub fn new(inner: Box<dyn Layouter>) -> Self {
        Self { inner }
    }
}

impl Layouter for DebugLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        if cx.tree.overlay.depth == 0 {
            // Drop entries of a pass that failed after measuring.
            cx.tree.overlay.active.clear();
        }
        cx.tree.overlay.depth += 1;
        let result = self.inner.layout(cx, constraints);
        let overlay = &mut cx.tree.overlay;
        overlay.depth -= 1;
        match &result {
            Ok(size) => overlay.mark_layout(cx.id, *size),
            Err(_) if overlay.depth == 0 => overlay.active.clear(),
            Err(_) => {}
        }
        result
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        let overlay = &mut cx.tree.overlay;
        overlay.depth += 1;
        overlay.mark_position(cx.id, position);
        let result = self.inner.position_at(cx, position);

        let overlay = &mut cx.tree.overlay;
        overlay.depth -= 1;
        if overlay.depth > 0 {
            return result;
        }
        let entries = mem::take(&mut overlay.active);
        result?;
        if !entries.is_empty() {
            cx.tree.overlay.ready.push(HighlightBatch { entries });
            cx.backend().invalidate(None)?;
        }
        Ok(())
    }

    fn sizing_independent_of_children(&self, widget: &dyn Widget) -> bool {
        self.inner.sizing_independent_of_children(widget)
    }
}

impl ElementTree {
    /// Batches completed since the last call, oldest first
    pub fn take_highlight_batches(&mut self) -> Vec<HighlightBatch> {
        mem::take(&mut self.overlay.ready)
    }

    /// Clear the highlights of a batch.
    ///
    /// Nodes laid out again since the batch was recorded keep their newer
    /// highlight. Invalidates the window and returns true if anything was
    /// cleared.
    pub fn cancel_highlights(&mut self, batch: HighlightBatch) -> Result<bool> {
        let mut changed = false;
        for (id, version) in batch.entries {
            if let Some(outline) = self.overlay.outlines.get_mut(id) {
                if outline.version == version && outline.highlight {
                    outline.highlight = false;
                    changed = true;
                }
            }
        }
        if changed {
            self.backend.invalidate(None)?;
        }
        Ok(changed)
    }

    /// Recorded outlines in depth-first, left-to-right layouter order
    pub fn debug_outlines(&self) -> Vec<DebugRect> {
        let mut out = Vec::new();
        let mut stack: Vec<LayouterId> = self.root_layouter().into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Some(outline) = self.overlay.outlines.get(id) {
                out.push(DebugRect {
                    rect: Rect::from_origin_size(outline.position, outline.size),
                    highlight: outline.highlight,
                });
            }
            stack.extend(self.layouters[id].children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::tree::TreeOptions;
    use std::rc::Rc;
    use trellis_platform::{BackendCall, HeadlessBackend};

    fn debug_tree(probe: &HeadlessBackend) -> ElementTree {
        ElementTree::new(probe.boxed(), TreeOptions::new().debug_layout(true))
    }

    fn sample() -> Rc<TestStack> {
        Rc::new(
            TestStack::new()
                .child(TestLeaf::new("a").size(30, 10))
                .child(TestLeaf::new("b").size(40, 20)),
        )
    }

    #[test]
    fn test_layout_highlights_and_batches() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = debug_tree(&probe);
        tree.mount(sample()).unwrap();
        tree.layout_window().unwrap();

        let batches = tree.take_highlight_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
        assert!(probe.calls().contains(&BackendCall::Invalidate(None)));

        let outlines = tree.debug_outlines();
        assert_eq!(
            outlines.iter().map(|o| o.rect).collect::<Vec<_>>(),
            vec![
                Rect::new(0, 0, 40, 30),
                Rect::new(0, 0, 30, 10),
                Rect::new(0, 10, 40, 30),
            ]
        );
        assert!(outlines.iter().all(|o| o.highlight));
    }

    #[test]
    fn test_cancel_clears_highlights() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = debug_tree(&probe);
        tree.mount(sample()).unwrap();
        tree.layout_window().unwrap();
        let batch = tree.take_highlight_batches().remove(0);
        probe.clear_calls();

        assert!(tree.cancel_highlights(batch.clone()).unwrap());
        assert!(tree.debug_outlines().iter().all(|o| !o.highlight));
        assert_eq!(probe.calls(), vec![BackendCall::Invalidate(None)]);

        // Nothing left to clear.
        assert!(!tree.cancel_highlights(batch).unwrap());
    }

    #[test]
    fn test_newer_layout_keeps_highlight() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = debug_tree(&probe);
        tree.mount(sample()).unwrap();
        tree.layout_window().unwrap();
        let first = tree.take_highlight_batches().remove(0);
        tree.layout_window().unwrap();

        assert!(!tree.cancel_highlights(first).unwrap());
        assert!(tree.debug_outlines().iter().all(|o| o.highlight));
    }

    #[test]
    fn test_failed_layout_queues_nothing() {
        let probe = HeadlessBackend::new(Size::new(20, 20));
        let mut tree = debug_tree(&probe);
        tree.mount(sample()).unwrap();

        assert!(tree.layout_window().is_err());
        assert!(tree.take_highlight_batches().is_empty());
        assert!(!probe.calls().contains(&BackendCall::Invalidate(None)));
    }

    #[test]
    fn test_root_overflow_does_not_leak_into_next_batch() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = debug_tree(&probe);
        tree.mount(Rc::new(TestLeaf::new("tall").size(10, 500))).unwrap();
        assert!(tree.layout_window().is_err());
        assert!(tree.take_highlight_batches().is_empty());

        tree.update(Rc::new(TestLeaf::new("tall").size(10, 50))).unwrap();
        tree.layout_window().unwrap();

        let batches = tree.take_highlight_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
    }

    #[test]
    fn test_disabled_overlay_records_nothing() {
        let probe = HeadlessBackend::new(Size::new(300, 200));
        let mut tree = tree_with(&probe);
        tree.mount(sample()).unwrap();
        tree.layout_window().unwrap();

        assert!(tree.debug_outlines().is_empty());
        assert!(tree.take_highlight_batches().is_empty());
    }
}
