// ABOUTME: Tag type definitions
// ABOUTME: Structures for user-owned tags attached to tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of suggestions an autocomplete query may request
pub const MAX_AUTOCOMPLETE_LIMIT: i64 = 20;

/// Default number of autocomplete suggestions
pub const DEFAULT_AUTOCOMPLETE_LIMIT: i64 = 10;

/// Maximum tag name length in characters, after normalization
pub const MAX_TAG_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub name: String,
}

/// Canonical form for stored tag names: trimmed and lowercased, so that
/// per-user uniqueness and prefix lookup are case-insensitive.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}
