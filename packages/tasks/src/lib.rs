// ABOUTME: Task management for Taskdeck
// ABOUTME: Provides types and the storage layer behind the filtered task listing

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TaskStorage;
pub use types::{Task, TaskCreateInput, TaskFilter, TaskUpdateInput};
