//! Validation errors raised before any task state is mutated.

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a task draft is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is empty after trimming.
    #[error("task name cannot be empty")]
    EmptyName,
    /// Task description is empty after trimming.
    #[error("task description cannot be empty")]
    EmptyDescription,
    /// Due date field is empty.
    #[error("due date cannot be empty")]
    EmptyDueDate,
    /// Due date is not an ISO `YYYY-MM-DD` calendar date.
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
    /// Due date lies before the day the task is created.
    #[error("due date {due} is before today ({today})")]
    DueDateInPast {
        /// The rejected due date.
        due: NaiveDate,
        /// The creation day it was compared against.
        today: NaiveDate,
    },
    /// Priority text did not name a known tier.
    #[error("unknown priority '{0}' (expected high, medium or low)")]
    UnknownPriority(String),
}
