//! LIFO view of the task set.

use super::{OrderingStructure, TaskRef};
use crate::task::TaskId;

/// Last-in, first-out stack of task handles.
#[derive(Debug, Clone, Default)]
pub struct TaskStack {
    items: Vec<TaskRef>,
}

impl TaskStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pushes a handle on top.
    pub fn push(&mut self, task: TaskRef) {
        self.items.push(task);
    }

    /// Removes and returns the most recently pushed remaining handle.
    pub fn pop(&mut self) -> Option<TaskRef> {
        self.items.pop()
    }

    /// Returns the top handle without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&TaskRef> {
        self.items.last()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Handles from top to bottom.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &TaskRef> {
        self.items.iter().rev()
    }
}

impl OrderingStructure for TaskStack {
    fn insert(&mut self, task: TaskRef) {
        self.push(task);
    }

    fn take_next(&mut self) -> Option<TaskRef> {
        self.pop()
    }

    fn peek_next(&self) -> Option<&TaskRef> {
        self.peek()
    }

    fn remove_by_id(&mut self, id: TaskId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn ids(&self) -> Vec<TaskId> {
        self.iter_top_down().map(|t| t.id).collect()
    }
}
