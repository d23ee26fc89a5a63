//! FIFO view of the task set.

use std::collections::VecDeque;

use super::{OrderingStructure, TaskRef};
use crate::task::TaskId;

/// First-in, first-out queue of task handles.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    items: VecDeque<TaskRef>,
}

impl TaskQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Appends a handle at the back.
    pub fn enqueue(&mut self, task: TaskRef) {
        self.items.push_back(task);
    }

    /// Removes and returns the earliest remaining handle.
    pub fn dequeue(&mut self) -> Option<TaskRef> {
        self.items.pop_front()
    }

    /// Returns the front handle without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&TaskRef> {
        self.items.front()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl OrderingStructure for TaskQueue {
    fn insert(&mut self, task: TaskRef) {
        self.enqueue(task);
    }

    fn take_next(&mut self) -> Option<TaskRef> {
        self.dequeue()
    }

    fn peek_next(&self) -> Option<&TaskRef> {
        self.front()
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
        self.items.iter().map(|t| t.id).collect()
    }
}
