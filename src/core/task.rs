//! Type-erased callable holder stored by value in queue slots.

use std::fmt;

/// A unit of work: one zero-argument, zero-return callable, invoked at most
/// once.
///
/// Queue slots hold tasks by value. An empty (default) task marks a free
/// slot; popping a slot replaces its contents with `Task::default()` and
/// moves the armed task out, so captured state is transferred, never copied.
pub struct Task {
    callable: Option<Box<dyn FnOnce() + Send>>,
}

impl Task {
    /// Wrap a callable into a task.
    pub fn new<F>(callable: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callable: Some(Box::new(callable)),
        }
    }

    /// Whether this task holds a callable.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.callable.is_some()
    }

    /// Consume the task and invoke its callable.
    ///
    /// Running an empty task is a no-op; an armed task runs exactly once
    /// because `run` takes the task by value.
    pub fn run(self) {
        if let Some(callable) = self.callable {
            callable();
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Self { callable: None }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("armed", &self.is_armed())
            .finish()
    }
}
