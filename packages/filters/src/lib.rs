// ABOUTME: Client-side filter/sort/search state for the task list
// ABOUTME: Pure state transitions, durable snapshot persistence, and debounced search

pub mod debounce;
pub mod state;
pub mod store;

// Re-export main types
pub use debounce::{QueryGate, SearchCommit, SearchDebouncer, SEARCH_DEBOUNCE};
pub use state::{FilterState, StatusFilter};
pub use store::{FilterStore, JsonFileStore};
