//! Ordering structures over the task set.
//!
//! Each structure holds [`TaskRef`] handles rather than tasks, so the owning
//! registry stays the single source of truth for task fields. The three
//! disciplines are:
//!
//! - [`TaskStack`]: last in, first out.
//! - [`TaskQueue`]: first in, first out.
//! - [`PriorityQueue`]: lowest `(rank, id)` first.
//!
//! None of them filter by completion; a completed task stays in a structure
//! until it is dequeued from it or removed by id.

mod priority;
mod queue;
mod stack;

pub use priority::PriorityQueue;
pub use queue::TaskQueue;
pub use stack::TaskStack;

use crate::task::{Priority, Task, TaskId};

/// Lightweight handle to a task held by an ordering structure.
///
/// Carries just enough to order the task without consulting the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskRef {
    /// Identity of the referenced task.
    pub id: TaskId,
    /// Priority tier used by [`PriorityQueue`].
    pub priority: Priority,
}

impl TaskRef {
    /// Creates a handle for the given id and priority.
    #[must_use]
    pub const fn new(id: TaskId, priority: Priority) -> Self {
        Self { id, priority }
    }

    /// Sort key for priority ordering. Ids are monotonic, so the id doubles
    /// as the insertion sequence for breaking ties.
    #[must_use]
    pub const fn priority_key(&self) -> (u8, TaskId) {
        (self.priority.rank(), self.id)
    }
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self::new(task.id, task.priority)
    }
}

/// Common interface over the three ordering disciplines.
///
/// `insert` and `take_next` map onto each structure's own primitives
/// (`push`/`pop`, `enqueue`/`dequeue`). `remove_by_id` is not a discipline
/// primitive; it exists so the registry can delete arbitrary tasks.
pub trait OrderingStructure {
    /// Adds a handle according to the structure's discipline.
    fn insert(&mut self, task: TaskRef);

    /// Removes and returns the next handle the discipline yields.
    fn take_next(&mut self) -> Option<TaskRef>;

    /// Returns the next handle without removing it.
    fn peek_next(&self) -> Option<&TaskRef>;

    /// Removes every handle with the given id. Returns `true` if any was removed.
    fn remove_by_id(&mut self, id: TaskId) -> bool;

    /// Number of handles held.
    fn len(&self) -> usize;

    /// Whether the structure holds no handles.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in the order `take_next` would yield them.
    fn ids(&self) -> Vec<TaskId>;

    /// Whether a handle with the given id is held.
    fn contains(&self, id: TaskId) -> bool {
        self.ids().contains(&id)
    }
}
