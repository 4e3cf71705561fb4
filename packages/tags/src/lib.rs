// ABOUTME: Tag management system for organizing tasks
// ABOUTME: Provides types and storage layer for user-owned task tags

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TagStorage;
pub use types::{
    normalize_tag_name, Tag, TagCreateInput, DEFAULT_AUTOCOMPLETE_LIMIT, MAX_AUTOCOMPLETE_LIMIT,
    MAX_TAG_NAME_LEN,
};
