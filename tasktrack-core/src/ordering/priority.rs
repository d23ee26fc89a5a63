//! Priority-ordered view of the task set.
//!
//! Handles are kept sorted by `(rank, id)` ascending. Insertion finds its
//! slot with a binary search, so the structure never re-sorts. Because ids
//! grow with every insert, two handles of the same tier always stay in
//! insertion order.

use std::collections::VecDeque;

use super::{OrderingStructure, TaskRef};
use crate::task::TaskId;

/// Sorted priority queue of task handles. The minimum is at the front.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    items: VecDeque<TaskRef>,
}

impl PriorityQueue {
    /// Creates an empty priority queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Inserts a handle at its sorted position.
    ///
    /// A handle whose key equals an existing one lands after it.
    pub fn enqueue(&mut self, task: TaskRef) {
        let key = task.priority_key();
        let at = self.items.partition_point(|t| t.priority_key() <= key);
        self.items.insert(at, task);
    }

    /// Removes and returns the most urgent handle.
    pub fn dequeue(&mut self) -> Option<TaskRef> {
        self.items.pop_front()
    }

    /// Returns the most urgent handle without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&TaskRef> {
        self.items.front()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl OrderingStructure for PriorityQueue {
    fn insert(&mut self, task: TaskRef) {
        self.enqueue(task);
    }

    fn take_next(&mut self) -> Option<TaskRef> {
        self.dequeue()
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
        self.items.iter().map(|t| t.id).collect()
    }
}
