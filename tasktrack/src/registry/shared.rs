//! Lock-guarded registry for multi-threaded hosts.
//!
//! Every operation takes the lock for its whole duration, so each compound
//! mutation is atomic with respect to other callers. Sequences that must
//! not interleave with other callers (dequeue then complete, for example)
//! go through [`SharedRegistry::transaction`].

use std::sync::Arc;

use parking_lot::Mutex;
use tasktrack_core::{Priority, Task, TaskId, ValidationError};

use super::{RegistryError, SortMode, Stats, TaskRegistry};

/// Cloneable handle to a registry behind a mutex.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<TaskRegistry>>,
}

impl SharedRegistry {
    /// Wraps an existing registry.
    #[must_use]
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Runs `f` with exclusive access to the registry.
    ///
    /// No other caller observes the registry between the steps `f` takes.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut TaskRegistry) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// See [`TaskRegistry::add_task`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is empty or malformed.
    pub fn add_task(
        &self,
        name: &str,
        description: &str,
        due_date: &str,
        priority: Priority,
    ) -> Result<Task, ValidationError> {
        self.inner.lock().add_task(name, description, due_date, priority)
    }

    /// See [`TaskRegistry::complete_task`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no task has this id.
    pub fn complete_task(&self, id: TaskId) -> Result<Task, RegistryError> {
        self.inner.lock().complete_task(id)
    }

    /// See [`TaskRegistry::remove_task`].
    pub fn remove_task(&self, id: TaskId) -> Option<Task> {
        self.inner.lock().remove_task(id)
    }

    /// See [`TaskRegistry::reorder_by`].
    #[must_use]
    pub fn reorder_by(&self, mode: SortMode) -> Vec<Task> {
        self.inner.lock().reorder_by(mode)
    }

    /// See [`TaskRegistry::dequeue_next_arrival`].
    pub fn dequeue_next_arrival(&self) -> Option<Task> {
        self.inner.lock().dequeue_next_arrival()
    }

    /// See [`TaskRegistry::dequeue_most_urgent`].
    pub fn dequeue_most_urgent(&self) -> Option<Task> {
        self.inner.lock().dequeue_most_urgent()
    }

    /// See [`TaskRegistry::undo_last_added`].
    pub fn undo_last_added(&self) -> Option<Task> {
        self.inner.lock().undo_last_added()
    }

    /// See [`TaskRegistry::process_next_arrival`].
    pub fn process_next_arrival(&self) -> Option<Task> {
        self.inner.lock().process_next_arrival()
    }

    /// See [`TaskRegistry::process_most_urgent`].
    pub fn process_most_urgent(&self) -> Option<Task> {
        self.inner.lock().process_most_urgent()
    }

    /// Snapshot of the pending tasks, most recent first.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.inner.lock().pending_tasks()
    }

    /// Snapshot of the completed tasks, most recent first.
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.inner.lock().completed_tasks()
    }

    /// Current counts.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.inner.lock().stats()
    }

    /// Number of tasks in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
