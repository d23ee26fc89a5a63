//! `TaskTrack`: task registry with stack, queue and priority views.

pub mod clock;
pub mod config;
pub mod console;
pub mod registry;
