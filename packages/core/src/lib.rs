// ABOUTME: Core types, constants, and utilities for Taskdeck
// ABOUTME: Foundational package providing shared functionality across all Taskdeck packages

pub mod constants;
pub mod types;

// Re-export main types
pub use types::{InvalidEnumValue, SortField, SortOrder, TaskPriority};

// Re-export constants
pub use constants::{database_file, filter_snapshot_file, taskdeck_dir};
