//! Shared task model and ordering structures for `TaskTrack`.

pub mod error;
pub mod ordering;
pub mod task;

pub use error::ValidationError;
pub use ordering::{OrderingStructure, PriorityQueue, TaskQueue, TaskRef, TaskStack};
pub use task::{Priority, Task, TaskId};
