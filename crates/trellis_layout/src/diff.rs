//! Reconciliation
//!
//! Brings an existing element subtree in line with a new widget subtree.
//! Wherever the old and new widgets match (same id, same type) the element
//! is kept and updated in place, so native controls, layouters and state
//! survive. Anything that stops matching is destroyed and rebuilt.
//!
//! Child lists are resolved in three phases:
//!
//! 1. **Top-down** - match pairs from the front while widgets match
//! 2. **Bottom-up** - match pairs from the back, never crossing phase 1
//! 3. **Middle** - remaining old elements with an id go into a lookup,
//!    id-less ones into an ordered pool. A remaining new widget with an id
//!    takes the element with that id, one without takes the next pooled
//!    element, and anything unmatched is built fresh.
//!
//! Whatever is left over is destroyed. Pure appends, pure removals and
//! reorders by id all reuse every surviving element without an O(m·n) search.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{Result, WidgetDescriptor};
use crate::key::WidgetId;
use crate::tree::{ElementId, ElementTree};
use crate::widget::{widget_match, BuildCx, Container, WidgetKind, WidgetRef};

impl ElementTree {
    /// Reconcile the whole tree against a new root widget.
    ///
    /// Mounts the widget when the tree is empty. Layout is left to the
    /// caller.
    pub fn update(&mut self, widget: WidgetRef) -> Result<ElementId> {
        let Some(root) = self.root else {
            return self.mount(widget);
        };
        self.root = None;
        match self.reconcile(root, widget) {
            Ok(id) => {
                self.root = Some(id);
                self.refresh_projection_from(id);
                Ok(id)
            }
            Err(err) => {
                // A failed rebuild has already destroyed the old root.
                if self.elements.contains_key(root) {
                    self.root = Some(root);
                }
                Err(err)
            }
        }
    }

    /// Reconcile one element against `widget`.
    ///
    /// Returns the same element when the widgets match, or a freshly built
    /// one that replaces it under the same parent.
    pub(crate) fn reconcile(&mut self, id: ElementId, widget: WidgetRef) -> Result<ElementId> {
        let current = self.elements[id].widget.clone();
        if !widget_match(&*current, &*widget) {
            debug!(
                element = ?id,
                old = %WidgetDescriptor::of(&*current),
                new = %WidgetDescriptor::of(&*widget),
                "widget mismatch, rebuilding subtree"
            );
            let parent = self.elements[id].parent;
            self.destroy(id);
            return self.build(widget, parent);
        }
        self.update_in_place(id, widget)?;
        Ok(id)
    }

    /// Apply a matching widget to an element and reconcile below it.
    fn update_in_place(&mut self, id: ElementId, widget: WidgetRef) -> Result<()> {
        trace!(element = ?id, widget = %WidgetDescriptor::of(&*widget), "update");
        let node = &mut self.elements[id];
        let old = std::mem::replace(&mut node.widget, widget.clone());
        if let Some(hooks) = node.hooks.as_mut() {
            let mut cx = BuildCx::new(&mut *self.backend, &self.poster, id);
            hooks.set_widget(&mut cx, &*old, &*widget)?;
        }

        match widget.kind() {
            WidgetKind::Leaf => Ok(()),
            WidgetKind::Container(container) => self.reconcile_children(id, container),
            WidgetKind::Stateless(stateless) => {
                let child = {
                    let cx = BuildCx::new(&mut *self.backend, &self.poster, id);
                    stateless.build(&cx)
                };
                self.reconcile_only_child(id, child)
            }
            WidgetKind::Stateful(_) => {
                let child = self.build_from_state(id);
                self.reconcile_only_child(id, child)
            }
        }
    }

    /// Reconcile the single child of a stateless or stateful element
    pub(crate) fn reconcile_only_child(&mut self, id: ElementId, widget: WidgetRef) -> Result<()> {
        let Some(&old) = self.elements[id].children.first() else {
            // Left childless by an earlier failed update.
            let child = self.build(widget, Some(id))?;
            self.elements[id].children.push(child);
            self.refresh_projection_from(id);
            return Ok(());
        };
        let result = self.reconcile(old, widget);
        match result {
            Ok(new) => {
                if new != old {
                    self.elements[id].children[0] = new;
                    self.refresh_projection_from(id);
                }
                Ok(())
            }
            Err(err) => {
                if !self.elements.contains_key(old) {
                    self.elements[id].children.clear();
                    self.refresh_projection_from(id);
                }
                Err(err)
            }
        }
    }

    /// Resolve a container's child list and refresh its layouter children.
    fn reconcile_children(&mut self, id: ElementId, container: &dyn Container) -> Result<()> {
        let old = std::mem::take(&mut self.elements[id].children);
        let mut diff = ChildDiff::new(old, container.num_children());
        let result = self.diff_children(id, container, &mut diff);

        let (children, leftovers) = diff.finish();
        for stale in leftovers {
            self.destroy(stale);
        }
        self.elements[id].children = children;
        self.refresh_layouter_children(id);
        result
    }

    fn diff_children(
        &mut self,
        id: ElementId,
        container: &dyn Container,
        diff: &mut ChildDiff,
    ) -> Result<()> {
        let old_len = diff.old.len();
        let new_len = container.num_children();

        // Top-down
        let mut top = 0;
        while top < old_len && top < new_len {
            let Some(old) = diff.old[top] else { break };
            let widget = container.child(top);
            if !widget_match(&*self.elements[old].widget, &*widget) {
                break;
            }
            diff.old[top] = None;
            diff.new[top] = Some(old);
            self.update_in_place(old, widget)?;
            top += 1;
        }

        // Bottom-up
        let mut old_end = old_len;
        let mut new_end = new_len;
        while old_end > top && new_end > top {
            let Some(old) = diff.old[old_end - 1] else { break };
            let widget = container.child(new_end - 1);
            if !widget_match(&*self.elements[old].widget, &*widget) {
                break;
            }
            diff.old[old_end - 1] = None;
            diff.new[new_end - 1] = Some(old);
            self.update_in_place(old, widget)?;
            old_end -= 1;
            new_end -= 1;
        }
        trace!(
            element = ?id,
            top,
            bottom = new_len - new_end,
            middle = new_end - top,
            "diff children"
        );

        // Middle
        let mut keyed: FxHashMap<WidgetId, usize> = FxHashMap::default();
        let mut pool: VecDeque<usize> = VecDeque::new();
        for index in top..old_end {
            let Some(old) = diff.old[index] else { continue };
            match self.elements[old].widget.widget_id() {
                Some(key) => {
                    // Duplicate ids: the later element wins, the earlier is left over.
                    keyed.insert(key.clone(), index);
                }
                None => pool.push_back(index),
            }
        }

        for index in top..new_end {
            let widget = container.child(index);
            // Keyed widgets only match by id, unkeyed ones by order.
            let reuse = match widget.widget_id() {
                Some(key) => keyed.remove(key),
                None => pool.pop_front(),
            };
            let result = match reuse.and_then(|slot| diff.old[slot].take()) {
                Some(old) => self.reconcile(old, widget).map_err(|err| {
                    // Kept elements stay in the list, rebuilt ones are gone.
                    if self.elements.contains_key(old) {
                        diff.new[index] = Some(old);
                    }
                    err
                }),
                None => self.build(widget, Some(id)),
            };
            diff.new[index] = Some(result?);
        }
        Ok(())
    }
}

/// Bookkeeping for one child-list diff.
///
/// Old slots are emptied as elements are consumed, new slots filled as they
/// are resolved, so an error midway still leaves a consistent split between
/// elements to keep and elements to destroy.
struct ChildDiff {
    old: Vec<Option<ElementId>>,
    new: Vec<Option<ElementId>>,
}

impl ChildDiff {
    fn new(old: Vec<ElementId>, new_len: usize) -> Self {
        Self {
            old: old.into_iter().map(Some).collect(),
            new: vec![None; new_len],
        }
    }

    /// Split into the resolved child list and the unconsumed old elements
    fn finish(self) -> (Vec<ElementId>, Vec<ElementId>) {
        (
            self.new.into_iter().flatten().collect(),
            self.old.into_iter().flatten().collect(),
        )
    }
}
