//! Posted-task queue
//!
//! Native input callbacks fire while the engine is idle but have no access
//! to the element tree. They enqueue a task on the tree's [`Poster`]
//! instead; the event loop drains the queue on the owning thread with
//! [`ElementTree::run_posted`](crate::ElementTree::run_posted).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::tree::ElementTree;

/// Work to run against the element tree
pub type Task = Box<dyn FnOnce(&mut ElementTree) -> Result<()>>;

/// Single-threaded handle to an element tree's task queue
#[derive(Clone, Default)]
pub struct Poster {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl Poster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `task` to run on the next drain
    pub fn post(&self, task: impl FnOnce(&mut ElementTree) -> Result<()> + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub(crate) fn pop(&self) -> Option<Task> {
        self.queue.borrow_mut().pop_front()
    }
}

impl fmt::Debug for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster").field("pending", &self.len()).finish()
    }
}
