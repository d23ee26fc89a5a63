//! Task entity types for `TaskTrack`.
//!
//! A [`Task`] is identified by a registry-assigned [`TaskId`]. Its fields are
//! fixed at creation except for the completion flag, which can be raised once
//! and never lowered.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Input format for due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique, monotonically assigned task identifier.
///
/// Ids start at 1 and are never reused, so comparing two ids also compares
/// the order in which the tasks were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// The first id handed out by a fresh registry.
    pub const FIRST: Self = Self(1);

    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Priority tier of a task.
///
/// Variants are declared in rank order, so the derived `Ord` sorts
/// `High < Medium < Low` and the most urgent tier compares smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Rank 1.
    High,
    /// Rank 2.
    Medium,
    /// Rank 3.
    Low,
}

impl Priority {
    /// All tiers, most urgent first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Numeric rank; lower ranks are dequeued first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" | "1" => Ok(Self::High),
            "medium" | "m" | "2" => Ok(Self::Medium),
            "low" | "l" | "3" => Ok(Self::Low),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// A single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Registry-assigned identifier.
    pub id: TaskId,
    /// Short name, trimmed and non-empty.
    pub name: String,
    /// Free-form description, trimmed and non-empty.
    pub description: String,
    /// Calendar day the task is due.
    pub due_date: NaiveDate,
    /// When the task was added. Only used for chronological ordering.
    pub created_at: DateTime<Utc>,
    /// Priority tier, fixed at creation.
    pub priority: Priority,
    completed: bool,
}

impl Task {
    /// Builds a pending task from already-validated fields.
    #[must_use]
    pub const fn new(
        id: TaskId,
        name: String,
        description: String,
        due_date: NaiveDate,
        created_at: DateTime<Utc>,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            name,
            description,
            due_date,
            created_at,
            priority,
            completed: false,
        }
    }

    /// Whether the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether the task is still pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.completed
    }

    /// Marks the task completed.
    ///
    /// Returns `true` if this call changed the flag, `false` if the task was
    /// already completed.
    pub const fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }
}

/// Returns the trimmed text, or `err` if nothing is left after trimming.
///
/// # Errors
///
/// Returns `err` when `raw` is empty or whitespace only.
pub fn require_text(raw: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

/// Parses an ISO `YYYY-MM-DD` due date.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyDueDate`] for blank input and
/// [`ValidationError::InvalidDueDate`] if the text is not a calendar date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDueDate);
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDueDate(trimmed.to_string()))
}

/// Rejects due dates earlier than `today`. A task due today is accepted.
///
/// # Errors
///
/// Returns [`ValidationError::DueDateInPast`] if `due < today`.
pub fn ensure_not_past(due: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if due < today {
        return Err(ValidationError::DueDateInPast { due, today });
    }
    Ok(())
}
