// ABOUTME: Shared storage layer for Taskdeck
// ABOUTME: Provides SQLite pool setup, pagination parameters, and common storage errors

pub mod pagination;
pub mod pool;
pub mod sessions;

use thiserror::Error;

pub use pagination::{PageWindow, PaginationError, PaginationParams, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use pool::connect_pool;
pub use sessions::SessionStorage;

/// Escape LIKE wildcards in user-supplied search text. Callers must pair
/// the resulting pattern with `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid stored value: {0}")]
    InvalidData(String),
    #[error("Duplicate tag name: {0}")]
    DuplicateTagName(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
