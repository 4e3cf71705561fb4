// ABOUTME: Task type definitions
// ABOUTME: Structures for tasks, their inputs, and the list filter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_core::{SortField, SortOrder, TaskPriority};
use taskdeck_tags::Tag;

/// Maximum title length in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    /// Tag names to attach; missing tags are created for the user
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    /// When present, replaces the task's tag set
    pub tags: Option<Vec<String>>,
}

/// Decoded filter/sort selection for the task listing. All present
/// filters combine with AND; the priority and tag sets are OR-matches.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub priorities: Vec<TaskPriority>,
    pub tag_ids: Vec<i64>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}
