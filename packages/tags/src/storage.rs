// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Handles per-user CRUD and prefix autocomplete for tags

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{normalize_tag_name, Tag, TagCreateInput};
use taskdeck_storage::{escape_like, PageWindow, StorageError};

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's tags with pagination and an optional case-insensitive
    /// prefix filter. Returns the page plus the total matching count.
    pub async fn list_tags(
        &self,
        user_id: &str,
        prefix: Option<&str>,
        window: PageWindow,
    ) -> Result<(Vec<Tag>, i64), StorageError> {
        debug!(
            "Fetching tags for user: {} (prefix: {:?}, offset: {})",
            user_id, prefix, window.offset
        );

        let pattern = prefix.map(|p| format!("{}%", escape_like(&normalize_tag_name(p))));

        let count: i64 = match &pattern {
            Some(pat) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM tags WHERE user_id = ? AND name LIKE ? ESCAPE '\\'",
                )
                .bind(user_id)
                .bind(pat)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?
            }
            None => sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?,
        };

        let rows = match &pattern {
            Some(pat) => {
                sqlx::query(
                    r#"
                    SELECT * FROM tags
                    WHERE user_id = ? AND name LIKE ? ESCAPE '\'
                    ORDER BY name
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(user_id)
                .bind(pat)
                .bind(window.limit)
                .bind(window.offset)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM tags WHERE user_id = ? ORDER BY name LIMIT ? OFFSET ?",
                )
                .bind(user_id)
                .bind(window.limit)
                .bind(window.offset)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?
            }
        };

        let tags = rows
            .iter()
            .map(row_to_tag)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((tags, count))
    }

    /// Return up to `limit` tag names owned by the user whose name starts
    /// with `prefix`, case-insensitive, ordered by name.
    pub async fn autocomplete(
        &self,
        user_id: &str,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<String>, StorageError> {
        debug!(
            "Autocomplete for user: {} (prefix: {}, limit: {})",
            user_id, prefix, limit
        );

        let pattern = format!("{}%", escape_like(&normalize_tag_name(prefix)));

        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM tags
            WHERE user_id = ? AND name LIKE ? ESCAPE '\'
            ORDER BY name
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(names)
    }

    /// Get a single tag by ID, scoped to its owner
    pub async fn get_tag(&self, user_id: &str, tag_id: i64) -> Result<Tag, StorageError> {
        debug!("Fetching tag: {} for user: {}", tag_id, user_id);

        let row = sqlx::query("SELECT * FROM tags WHERE id = ? AND user_id = ?")
            .bind(tag_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Tag"))?;

        row_to_tag(&row)
    }

    /// Create a new tag. The name is normalized before storage; a per-user
    /// duplicate (case-insensitive) is rejected.
    pub async fn create_tag(
        &self,
        user_id: &str,
        input: TagCreateInput,
    ) -> Result<Tag, StorageError> {
        let name = normalize_tag_name(&input.name);
        let now = Utc::now();

        debug!("Creating tag: {} for user: {}", name, user_id);

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM tags WHERE user_id = ? AND name = ?")
                .bind(user_id)
                .bind(&name)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        if existing.is_some() {
            return Err(StorageError::DuplicateTagName(name));
        }

        let result = sqlx::query(
            "INSERT INTO tags (user_id, name, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(&name)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_tag(user_id, result.last_insert_rowid()).await
    }

    /// Delete a tag. Associations to tasks are removed; the tasks
    /// themselves are untouched.
    pub async fn delete_tag(&self, user_id: &str, tag_id: i64) -> Result<(), StorageError> {
        debug!("Deleting tag: {} for user: {}", tag_id, user_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM tags WHERE id = ? AND user_id = ?")
            .bind(tag_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Tag"));
        }

        sqlx::query("DELETE FROM task_tags WHERE tag_id = ?")
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }
}

/// Convert a database row to a Tag
fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
    Ok(Tag {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
