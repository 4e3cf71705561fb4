// ABOUTME: Filter state and its pure transition functions
// ABOUTME: Derives the query parameters the list endpoint consumes

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use taskdeck_core::{SortField, SortOrder, TaskPriority};

/// Completion filter shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Active,
    Completed,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter {
    /// The `completed` query value this status maps to, if any
    pub fn completed_param(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(false),
            StatusFilter::Completed => Some(true),
        }
    }
}

/// The client-held filter selection driving the list query.
///
/// Every field carries a serde default so a snapshot written by an older
/// build (or with fields missing) merges over the defaults instead of
/// failing to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub priorities: BTreeSet<TaskPriority>,
    pub tag_ids: BTreeSet<i64>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl FilterState {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Add the priority to the selection, or remove it if already selected
    pub fn toggle_priority(&mut self, priority: TaskPriority) {
        if !self.priorities.insert(priority) {
            self.priorities.remove(&priority);
        }
    }

    /// Add the tag to the selection, or remove it if already selected
    pub fn toggle_tag(&mut self, tag_id: i64) {
        if !self.tag_ids.insert(tag_id) {
            self.tag_ids.remove(&tag_id);
        }
    }

    pub fn set_sort_by(&mut self, sort_by: SortField) {
        self.sort_by = sort_by;
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.sort_order = sort_order;
    }

    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    /// Clear search, status, priority, and tag selections. The sort
    /// selection survives.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.status = StatusFilter::All;
        self.priorities.clear();
        self.tag_ids.clear();
    }

    /// Restore full defaults, sort included
    pub fn reset_all(&mut self) {
        *self = FilterState::default();
    }

    /// Number of active filters, for UI badges
    pub fn active_filter_count(&self) -> usize {
        let mut count = self.priorities.len() + self.tag_ids.len();
        if self.status != StatusFilter::All {
            count += 1;
        }
        if !self.search.is_empty() {
            count += 1;
        }
        count
    }

    /// Derive the query parameters the list endpoint consumes. Inactive
    /// filters are omitted; the sort selection is always sent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(completed) = self.status.completed_param() {
            pairs.push(("completed", completed.to_string()));
        }
        if !self.priorities.is_empty() {
            let joined = self
                .priorities
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("priority", joined));
        }
        if !self.tag_ids.is_empty() {
            let joined = self
                .tag_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("tag_ids", joined));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));

        pairs
    }
}
