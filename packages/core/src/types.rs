// ABOUTME: Shared domain enums used by both the storage layer and the client filter state
// ABOUTME: Query-string tokens are validated against these closed enumerations at the boundary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A query-string token that does not belong to the closed enumeration
/// for its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
}

impl InvalidEnumValue {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Task priority. Declaration order doubles as the display order for
/// selected-priority sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            _ => Err(InvalidEnumValue::new("priority", s)),
        }
    }
}

/// Sort key for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Priority,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Priority => "priority",
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::CreatedAt
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            _ => Err(InvalidEnumValue::new("sort_by", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(InvalidEnumValue::new("sort_order", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for p in [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low] {
            assert_eq!(p.as_str().parse::<TaskPriority>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_tokens_name_their_field() {
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.field, "priority");
        assert_eq!(err.value, "urgent");

        let err = "due_date".parse::<SortField>().unwrap_err();
        assert_eq!(err.field, "sort_by");

        let err = "up".parse::<SortOrder>().unwrap_err();
        assert_eq!(err.field, "sort_order");
    }

    #[test]
    fn test_sort_order_toggle() {
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.toggled(), SortOrder::Asc);
    }
}
