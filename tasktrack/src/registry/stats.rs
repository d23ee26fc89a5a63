//! Aggregate task counts.
//!
//! `pending` is derived from the task set on demand. `in_progress` and
//! `completed` are running counters that only [`TaskRegistry`] mutations
//! touch; they are never recomputed from the task set.
//!
//! [`TaskRegistry`]: super::TaskRegistry

use std::fmt;

use serde::Serialize;

/// Snapshot of the registry's counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Tasks in the registry that are not completed.
    pub pending: usize,
    /// Running count of tasks added and not yet completed or removed.
    pub in_progress: usize,
    /// Running count of completed tasks not yet removed.
    pub completed: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tasks: {} | Completed: {} | In Progress: {}",
            self.pending, self.completed, self.in_progress
        )
    }
}

/// Incrementally maintained counters owned by the registry.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    in_progress: usize,
    completed: usize,
}

impl Counters {
    pub(crate) const fn on_added(&mut self) {
        self.in_progress += 1;
    }

    pub(crate) const fn on_completed(&mut self) {
        self.in_progress = self.in_progress.saturating_sub(1);
        self.completed += 1;
    }

    pub(crate) const fn on_removed(&mut self, was_completed: bool) {
        if was_completed {
            self.completed = self.completed.saturating_sub(1);
        } else {
            self.in_progress = self.in_progress.saturating_sub(1);
        }
    }

    pub(crate) const fn snapshot(self, pending: usize) -> Stats {
        Stats {
            pending,
            in_progress: self.in_progress,
            completed: self.completed,
        }
    }
}
