//! Application shell
//!
//! [`App`] owns the platform and one [`ElementTree`] per open window. The
//! host event loop forwards resize notifications to [`App::resize`] and
//! calls [`App::pump`] once per iteration, which runs tasks posted by
//! input callbacks and cancels debug highlights once their delay passes.

use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info};
use trellis_core::Size;
use trellis_layout::{ElementTree, HighlightBatch, TreeOptions, WidgetRef};
use trellis_platform::{Platform, WindowConfig};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, Result};

struct Window {
    config: WindowConfig,
    tree: ElementTree,
}

/// Highlight cancellation waiting for its deadline
struct DelayedCancel {
    due: Instant,
    window: String,
    batch: HighlightBatch,
}

/// A Trellis application
pub struct App {
    config: AppConfig,
    platform: Box<dyn Platform>,
    windows: IndexMap<String, Window>,
    delayed: Vec<DelayedCancel>,
}

impl App {
    pub fn new(config: AppConfig, platform: impl Platform + 'static) -> Self {
        Self {
            config,
            platform: Box::new(platform),
            windows: IndexMap::new(),
            delayed: Vec::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a window, build `root` into it and lay it out.
    ///
    /// Returns the window's id: the configured one, or a generated one when
    /// the configuration has none.
    pub fn create_window(&mut self, config: WindowConfig, root: WidgetRef) -> Result<String> {
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.windows.contains_key(&id) {
            return Err(AppError::DuplicateWindow(id));
        }

        let backend = self.platform.open_window(&config)?;
        let options = TreeOptions::new().debug_layout(self.config.debug.layout);
        let mut tree = ElementTree::new(backend, options);
        tree.mount(root)?;
        let size = tree.layout_window()?;
        info!(
            window = %id,
            platform = self.platform.name(),
            title = %config.title,
            %size,
            "window created"
        );

        self.windows.insert(id.clone(), Window { config, tree });
        self.schedule_highlights(&id, Instant::now());
        Ok(id)
    }

    /// Close a window, destroying its elements and native controls
    pub fn close_window(&mut self, id: &str) -> bool {
        self.delayed.retain(|task| task.window != id);
        let closed = self.windows.shift_remove(id).is_some();
        if closed {
            debug!(window = %id, "window closed");
        }
        closed
    }

    /// Replace a window's widget tree and lay it out again
    pub fn update(&mut self, id: &str, root: WidgetRef) -> Result<Size> {
        let tree = self.tree_mut(id)?;
        tree.update(root)?;
        let size = tree.layout_window()?;
        self.schedule_highlights(id, Instant::now());
        Ok(size)
    }

    /// Lay a window out for its new client size
    pub fn resize(&mut self, id: &str, width: i32, height: i32) -> Result<Size> {
        let size = self.tree_mut(id)?.layout(Size::new(width, height))?;
        debug!(window = %id, %size, "window resized");
        self.schedule_highlights(id, Instant::now());
        Ok(size)
    }

    /// Run posted tasks in every window, then the delayed work due at `now`.
    ///
    /// Returns how many posted tasks ran.
    pub fn pump(&mut self, now: Instant) -> Result<usize> {
        let mut ran = 0;
        let ids: Vec<String> = self.windows.keys().cloned().collect();
        for id in &ids {
            if let Some(window) = self.windows.get_mut(id) {
                ran += window.tree.run_posted()?;
            }
            self.schedule_highlights(id, now);
        }

        let (due, pending): (Vec<_>, Vec<_>) =
            self.delayed.drain(..).partition(|task| task.due <= now);
        self.delayed = pending;
        for task in due {
            if let Some(window) = self.windows.get_mut(&task.window) {
                window.tree.cancel_highlights(task.batch)?;
            }
        }
        Ok(ran)
    }

    /// Queue highlight cancellation for batches the window produced
    fn schedule_highlights(&mut self, id: &str, now: Instant) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let due = now + self.config.debug.highlight_delay();
        for batch in window.tree.take_highlight_batches() {
            self.delayed.push(DelayedCancel {
                due,
                window: id.to_string(),
                batch,
            });
        }
    }

    fn tree_mut(&mut self, id: &str) -> Result<&mut ElementTree> {
        self.windows
            .get_mut(id)
            .map(|window| &mut window.tree)
            .ok_or_else(|| AppError::UnknownWindow(id.to_string()))
    }

    /// Ids of the open windows, in creation order
    pub fn window_ids(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    pub fn window(&self, id: &str) -> Option<&ElementTree> {
        self.windows.get(id).map(|window| &window.tree)
    }

    pub fn window_mut(&mut self, id: &str) -> Option<&mut ElementTree> {
        self.windows.get_mut(id).map(|window| &mut window.tree)
    }

    pub fn window_config(&self, id: &str) -> Option<&WindowConfig> {
        self.windows.get(id).map(|window| &window.config)
    }

    /// Highlight cancellations not yet due
    pub fn pending_highlights(&self) -> usize {
        self.delayed.len()
    }
}
