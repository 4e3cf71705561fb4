// ABOUTME: Task storage layer using SQLite
// ABOUTME: Implements the filtered, sorted, paginated task listing plus CRUD

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{query::Query, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::types::{Task, TaskCreateInput, TaskFilter, TaskUpdateInput};
use taskdeck_core::{SortField, SortOrder, TaskPriority};
use taskdeck_storage::{escape_like, PageWindow, StorageError};
use taskdeck_tags::{normalize_tag_name, Tag};

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's tasks matching `filter`, sorted and paginated.
    ///
    /// Ownership is enforced in the WHERE clause, so rows belonging to
    /// other users are never loaded. The returned total is the count of
    /// all matching rows, computed independently of the page slice.
    pub async fn list_tasks(
        &self,
        user_id: &str,
        filter: &TaskFilter,
        window: PageWindow,
    ) -> Result<(Vec<Task>, i64), StorageError> {
        debug!(
            "Fetching tasks for user: {} (filter: {:?}, offset: {})",
            user_id, filter, window.offset
        );

        let predicate = filter_predicate(filter);
        let search_pattern = filter
            .search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

        let count_sql = format!("SELECT COUNT(*) FROM tasks t WHERE t.user_id = ?{predicate}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
        count_query = bind_filter_scalar(count_query, filter, &search_pattern);
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let page_sql = format!(
            "SELECT t.* FROM tasks t WHERE t.user_id = ?{predicate} {} LIMIT ? OFFSET ?",
            order_clause(filter.sort_by, filter.sort_order)
        );
        let mut page_query = sqlx::query(&page_sql).bind(user_id);
        page_query = bind_filter(page_query, filter, &search_pattern);
        page_query = page_query.bind(window.limit).bind(window.offset);

        let rows = page_query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut tasks = rows
            .iter()
            .map(row_to_task)
            .collect::<Result<Vec<_>, _>>()?;

        self.attach_tags(&mut tasks).await?;

        Ok((tasks, total))
    }

    /// Get a single task by ID, scoped to its owner
    pub async fn get_task(&self, user_id: &str, task_id: i64) -> Result<Task, StorageError> {
        debug!("Fetching task: {} for user: {}", task_id, user_id);

        let row = sqlx::query("SELECT t.* FROM tasks t WHERE t.id = ? AND t.user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Task"))?;

        let mut task = row_to_task(&row)?;
        self.attach_tags(std::slice::from_mut(&mut task)).await?;
        Ok(task)
    }

    pub async fn create_task(
        &self,
        user_id: &str,
        input: TaskCreateInput,
    ) -> Result<Task, StorageError> {
        let now = Utc::now();
        let completed = input.completed.unwrap_or(false);
        let priority = input.priority.unwrap_or_default();

        debug!("Creating task for user: {} (title: {})", user_id, input.title);

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (user_id, title, description, completed, priority, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(completed)
        .bind(priority.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let task_id = result.last_insert_rowid();

        if let Some(names) = &input.tags {
            self.replace_tags(user_id, task_id, names).await?;
        }

        self.get_task(user_id, task_id).await
    }

    pub async fn update_task(
        &self,
        user_id: &str,
        task_id: i64,
        input: TaskUpdateInput,
    ) -> Result<Task, StorageError> {
        debug!("Updating task: {} for user: {}", task_id, user_id);

        // Build dynamic UPDATE query based on provided fields; updated_at
        // is refreshed on every mutation.
        let mut query = String::from("UPDATE tasks SET updated_at = ?");

        if input.title.is_some() {
            query.push_str(", title = ?");
        }
        if input.description.is_some() {
            query.push_str(", description = ?");
        }
        if input.completed.is_some() {
            query.push_str(", completed = ?");
        }
        if input.priority.is_some() {
            query.push_str(", priority = ?");
        }

        query.push_str(" WHERE id = ? AND user_id = ?");

        let now = Utc::now();
        let mut q = sqlx::query(&query).bind(now);

        if let Some(title) = &input.title {
            q = q.bind(title);
        }
        if let Some(description) = &input.description {
            q = q.bind(description);
        }
        if let Some(completed) = input.completed {
            q = q.bind(completed);
        }
        if let Some(priority) = input.priority {
            q = q.bind(priority.as_str());
        }

        q = q.bind(task_id).bind(user_id);

        let result = q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Task"));
        }

        if let Some(names) = &input.tags {
            self.replace_tags(user_id, task_id, names).await?;
        }

        self.get_task(user_id, task_id).await
    }

    pub async fn delete_task(&self, user_id: &str, task_id: i64) -> Result<(), StorageError> {
        debug!("Deleting task: {} for user: {}", task_id, user_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Task"));
        }

        sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Replace a task's tag set with the given names, creating missing
    /// tags for the user. Empty names (after normalization) are skipped.
    async fn replace_tags(
        &self,
        user_id: &str,
        task_id: i64,
        names: &[String],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        let now = Utc::now();
        for name in names {
            let name = normalize_tag_name(name);
            if name.is_empty() {
                continue;
            }

            sqlx::query(
                "INSERT INTO tags (user_id, name, created_at) VALUES (?, ?, ?) ON CONFLICT(user_id, name) DO NOTHING",
            )
            .bind(user_id)
            .bind(&name)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            let tag_id: i64 =
                sqlx::query_scalar("SELECT id FROM tags WHERE user_id = ? AND name = ?")
                    .bind(user_id)
                    .bind(&name)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(StorageError::Sqlx)?;

            sqlx::query("INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?, ?)")
                .bind(task_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Attach tags to the given tasks with one grouped query
    async fn attach_tags(&self, tasks: &mut [Task]) -> Result<(), StorageError> {
        if tasks.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; tasks.len()].join(", ");
        let sql = format!(
            r#"
            SELECT tt.task_id AS task_id, tg.id, tg.user_id, tg.name, tg.created_at
            FROM task_tags tt
            JOIN tags tg ON tg.id = tt.tag_id
            WHERE tt.task_id IN ({placeholders})
            ORDER BY tg.name
            "#
        );

        let mut query = sqlx::query(&sql);
        for task in tasks.iter() {
            query = query.bind(task.id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut by_task: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            let task_id: i64 = row.try_get("task_id")?;
            by_task.entry(task_id).or_default().push(Tag {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
            });
        }

        for task in tasks.iter_mut() {
            task.tags = by_task.remove(&task.id).unwrap_or_default();
        }

        Ok(())
    }
}

/// SQL predicate fragments for the active filters, in bind order:
/// completed, priorities, tag_ids, search (twice).
fn filter_predicate(filter: &TaskFilter) -> String {
    let mut sql = String::new();

    if filter.completed.is_some() {
        sql.push_str(" AND t.completed = ?");
    }
    if !filter.priorities.is_empty() {
        let placeholders = vec!["?"; filter.priorities.len()].join(", ");
        sql.push_str(&format!(" AND t.priority IN ({placeholders})"));
    }
    if !filter.tag_ids.is_empty() {
        let placeholders = vec!["?"; filter.tag_ids.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM task_tags tt WHERE tt.task_id = t.id AND tt.tag_id IN ({placeholders}))"
        ));
    }
    if filter.search.is_some() {
        sql.push_str(
            " AND (LOWER(t.title) LIKE ? ESCAPE '\\' OR LOWER(COALESCE(t.description, '')) LIKE ? ESCAPE '\\')",
        );
    }

    sql
}

fn bind_filter<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    filter: &'q TaskFilter,
    search_pattern: &'q Option<String>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    if let Some(completed) = filter.completed {
        query = query.bind(completed);
    }
    for priority in &filter.priorities {
        query = query.bind(priority.as_str());
    }
    for tag_id in &filter.tag_ids {
        query = query.bind(*tag_id);
    }
    if let Some(pattern) = search_pattern {
        query = query.bind(pattern.as_str()).bind(pattern.as_str());
    }
    query
}

fn bind_filter_scalar<'q>(
    mut query: sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
    filter: &'q TaskFilter,
    search_pattern: &'q Option<String>,
) -> sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>> {
    if let Some(completed) = filter.completed {
        query = query.bind(completed);
    }
    for priority in &filter.priorities {
        query = query.bind(priority.as_str());
    }
    for tag_id in &filter.tag_ids {
        query = query.bind(*tag_id);
    }
    if let Some(pattern) = search_pattern {
        query = query.bind(pattern.as_str()).bind(pattern.as_str());
    }
    query
}

/// ORDER BY clause for the selected sort. Priority sorts by rank (low <
/// medium < high), title case-insensitively; ties always break by id so
/// pagination never duplicates or drops rows.
fn order_clause(sort_by: SortField, sort_order: SortOrder) -> String {
    let key = match sort_by {
        SortField::CreatedAt => "t.created_at",
        SortField::UpdatedAt => "t.updated_at",
        SortField::Title => "t.title COLLATE NOCASE",
        SortField::Priority => "CASE t.priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END",
    };
    let dir = match sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("ORDER BY {key} {dir}, t.id ASC")
}

fn row_to_task(row: &SqliteRow) -> Result<Task, StorageError> {
    let priority: String = row.try_get("priority")?;
    let priority: TaskPriority = priority
        .parse()
        .map_err(|e: taskdeck_core::InvalidEnumValue| StorageError::InvalidData(e.to_string()))?;

    Ok(Task {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        priority,
        tags: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
