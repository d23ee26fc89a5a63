//! Task registry and its synchronized ordering views.
//!
//! [`TaskRegistry`] owns every task and keeps the stack, queue and priority
//! structures in step with it. [`SharedRegistry`] and [`RegistryHandle`] are
//! the two ways to share one registry between concurrent callers.

pub mod actor;
pub mod shared;
pub mod stats;
pub mod store;

pub use actor::{RegistryCommand, RegistryHandle, spawn_registry};
pub use shared::SharedRegistry;
pub use stats::Stats;
pub use store::TaskRegistry;

use std::fmt;
use std::str::FromStr;

use tasktrack_core::{TaskId, ValidationError};
use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The task draft was rejected before any state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The registry actor has shut down.
    #[error("registry is no longer running")]
    Closed,
}

/// Ordering applied by [`TaskRegistry::reorder_by`].
///
/// Config files and the command line share the [`FromStr`] parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortMode {
    /// Most recently added first.
    #[default]
    Stack,
    /// Most urgent tier first, insertion order within a tier.
    Priority,
    /// Oldest `created_at` first.
    Chrono,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => write!(f, "stack"),
            Self::Priority => write!(f, "priority"),
            Self::Chrono => write!(f, "chrono"),
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stack" | "insertion" | "insertionstack" => Ok(Self::Stack),
            "priority" | "prio" => Ok(Self::Priority),
            "chrono" | "chronological" | "time" => Ok(Self::Chrono),
            other => Err(format!(
                "unknown sort mode '{other}' (expected stack, priority or chrono)"
            )),
        }
    }
}

impl TryFrom<String> for SortMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
