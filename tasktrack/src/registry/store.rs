//! The authoritative task collection.
//!
//! `TaskRegistry` owns every [`Task`] and mirrors each one into three
//! ordering structures. All mutation goes through the compound operations
//! below, each of which updates the task map, the structures and the
//! counters together before returning.

use std::collections::BTreeMap;
use std::sync::Arc;

use tasktrack_core::task::{parse_due_date, require_text};
use tasktrack_core::{
    OrderingStructure, Priority, PriorityQueue, Task, TaskId, TaskQueue, TaskRef, TaskStack,
    ValidationError,
};

use super::stats::{Counters, Stats};
use super::{RegistryError, SortMode};
use crate::clock::{Clock, SystemClock};

/// Owns the task set and keeps the stack, queue and priority views in sync.
pub struct TaskRegistry {
    /// Master collection. Ids are monotonic, so key order is insertion order.
    tasks: BTreeMap<TaskId, Task>,
    stack: TaskStack,
    queue: TaskQueue,
    priority: PriorityQueue,
    counters: Counters,
    next_id: TaskId,
    clock: Arc<dyn Clock>,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.tasks.len())
            .field("next_id", &self.next_id)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl TaskRegistry {
    /// Creates an empty registry stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty registry that reads time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: BTreeMap::new(),
            stack: TaskStack::new(),
            queue: TaskQueue::new(),
            priority: PriorityQueue::new(),
            counters: Counters::default(),
            next_id: TaskId::FIRST,
            clock,
        }
    }

    /// The clock this registry stamps tasks with.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Adds a new pending task.
    ///
    /// Name and description are trimmed. Nothing is mutated unless every
    /// field validates. Identical drafts produce distinct tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`], [`ValidationError::EmptyDescription`],
    /// [`ValidationError::EmptyDueDate`] or [`ValidationError::InvalidDueDate`].
    pub fn add_task(
        &mut self,
        name: &str,
        description: &str,
        due_date: &str,
        priority: Priority,
    ) -> Result<Task, ValidationError> {
        let name = require_text(name, ValidationError::EmptyName)?;
        let description = require_text(description, ValidationError::EmptyDescription)?;
        let due_date = parse_due_date(due_date)?;

        let id = self.next_id;
        self.next_id = id.next();
        let task = Task::new(id, name, description, due_date, self.clock.now(), priority);

        let handle = TaskRef::from(&task);
        self.stack.push(handle);
        self.queue.enqueue(handle);
        self.priority.enqueue(handle);
        self.tasks.insert(id, task.clone());
        self.counters.on_added();

        tracing::debug!(task_id = %id, %priority, due = %due_date, "task added");
        Ok(task)
    }

    /// Marks a task completed.
    ///
    /// Completing an already-completed task returns it unchanged and leaves
    /// the counters alone. The ordering structures are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no task has this id.
    pub fn complete_task(&mut self, id: TaskId) -> Result<Task, RegistryError> {
        let task = self.tasks.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        if task.mark_completed() {
            self.counters.on_completed();
            tracing::debug!(task_id = %id, "task completed");
        } else {
            tracing::trace!(task_id = %id, "task already completed");
        }
        Ok(task.clone())
    }

    /// Deletes a task from the registry and every ordering structure.
    ///
    /// Returns `None` without changing anything if the id is unknown.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.remove(&id)?;
        self.stack.remove_by_id(id);
        self.queue.remove_by_id(id);
        self.priority.remove_by_id(id);
        self.counters.on_removed(task.is_completed());
        tracing::debug!(task_id = %id, completed = task.is_completed(), "task removed");
        Some(task)
    }

    /// Returns the pending tasks in the requested order. Does not mutate.
    ///
    /// - [`SortMode::Stack`]: most recently added first.
    /// - [`SortMode::Priority`]: by rank, insertion order within a rank.
    /// - [`SortMode::Chrono`]: by `created_at`, insertion order on ties.
    #[must_use]
    pub fn reorder_by(&self, mode: SortMode) -> Vec<Task> {
        let pending = self.tasks.values().filter(|t| t.is_pending());
        match mode {
            SortMode::Stack => pending.rev().cloned().collect(),
            SortMode::Priority => {
                let mut tasks: Vec<Task> = pending.cloned().collect();
                tasks.sort_by_key(|t| t.priority.rank());
                tasks
            }
            SortMode::Chrono => {
                let mut tasks: Vec<Task> = pending.cloned().collect();
                tasks.sort_by_key(|t| t.created_at);
                tasks
            }
        }
    }

    /// Pops the oldest task still in the arrival queue.
    ///
    /// The task stays in the registry and is not completed; callers that
    /// want "process next" semantics use [`Self::process_next_arrival`].
    pub fn dequeue_next_arrival(&mut self) -> Option<Task> {
        let handle = self.queue.dequeue()?;
        tracing::debug!(task_id = %handle.id, "dequeued next arrival");
        self.tasks.get(&handle.id).cloned()
    }

    /// Pops the most urgent task still in the priority structure.
    ///
    /// Same contract as [`Self::dequeue_next_arrival`].
    pub fn dequeue_most_urgent(&mut self) -> Option<Task> {
        let handle = self.priority.dequeue()?;
        tracing::debug!(task_id = %handle.id, priority = %handle.priority, "dequeued most urgent");
        self.tasks.get(&handle.id).cloned()
    }

    /// Pops the most recently added surviving task off the stack and deletes
    /// it from the registry entirely.
    pub fn undo_last_added(&mut self) -> Option<Task> {
        let handle = self.stack.pop()?;
        tracing::debug!(task_id = %handle.id, "undo last added");
        self.remove_task(handle.id)
    }

    /// Dequeues arrivals until a pending one turns up, then completes it.
    ///
    /// Handles of tasks that are already completed are popped and skipped,
    /// so every returned task was pending when this call started.
    pub fn process_next_arrival(&mut self) -> Option<Task> {
        loop {
            let task = self.dequeue_next_arrival()?;
            if task.is_pending() {
                return self.complete_task(task.id).ok();
            }
            tracing::trace!(task_id = %task.id, "skipped completed arrival");
        }
    }

    /// Dequeues urgent tasks until a pending one turns up, then completes it.
    ///
    /// Same skipping rule as [`Self::process_next_arrival`].
    pub fn process_most_urgent(&mut self) -> Option<Task> {
        loop {
            let task = self.dequeue_most_urgent()?;
            if task.is_pending() {
                return self.complete_task(task.id).ok();
            }
            tracing::trace!(task_id = %task.id, "skipped completed urgent task");
        }
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// All tasks, most recently added first.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().rev()
    }

    /// Pending tasks, most recently added first.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.reorder_by(SortMode::Stack)
    }

    /// Completed tasks, most recently added first.
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks().filter(|t| t.is_completed()).cloned().collect()
    }

    /// Current counts.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let pending = self.tasks.values().filter(|t| t.is_pending()).count();
        self.counters.snapshot(pending)
    }

    /// Number of tasks in the registry, completed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ids held by the stack, top first.
    #[must_use]
    pub fn stack_ids(&self) -> Vec<TaskId> {
        self.stack.ids()
    }

    /// Ids held by the arrival queue, front first.
    #[must_use]
    pub fn queue_ids(&self) -> Vec<TaskId> {
        self.queue.ids()
    }

    /// Ids held by the priority structure, most urgent first.
    #[must_use]
    pub fn priority_ids(&self) -> Vec<TaskId> {
        self.priority.ids()
    }
}
