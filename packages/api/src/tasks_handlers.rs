// ABOUTME: HTTP request handlers for task operations
// ABOUTME: Decodes and validates the list query string before it reaches storage

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::{ApiError, ApiResult};
use taskdeck_core::{SortField, SortOrder, TaskPriority};
use taskdeck_storage::{PaginationParams, DEFAULT_PER_PAGE};
use taskdeck_tags::{normalize_tag_name, MAX_TAG_NAME_LEN};
use taskdeck_tasks::types::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use taskdeck_tasks::{Task, TaskCreateInput, TaskFilter, TaskUpdateInput};

/// Raw query string for the task listing. Every field is decoded by hand
/// so an invalid token produces a validation error naming the field
/// instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    completed: Option<String>,
    priority: Option<String>,
    tag_ids: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

impl ListTasksQuery {
    fn decode(self) -> ApiResult<(TaskFilter, PaginationParams)> {
        let completed = match self.completed.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(ApiError::validation(format!(
                    "invalid completed value: {other}"
                )))
            }
        };

        let mut priorities = Vec::new();
        if let Some(raw) = &self.priority {
            for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                priorities.push(token.parse::<TaskPriority>()?);
            }
        }

        let mut tag_ids = Vec::new();
        if let Some(raw) = &self.tag_ids {
            for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let id = token.parse::<i64>().map_err(|_| {
                    ApiError::validation(format!("invalid tag_ids value: {token}"))
                })?;
                tag_ids.push(id);
            }
        }

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let sort_by = match self.sort_by.as_deref() {
            Some(raw) => raw.parse::<SortField>()?,
            None => SortField::default(),
        };
        let sort_order = match self.sort_order.as_deref() {
            Some(raw) => raw.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        let page = parse_count("page", self.page.as_deref(), 1)?;
        let per_page = parse_count("per_page", self.per_page.as_deref(), DEFAULT_PER_PAGE)?;

        Ok((
            TaskFilter {
                completed,
                priorities,
                tag_ids,
                search,
                sort_by,
                sort_order,
            },
            PaginationParams::new(page, per_page),
        ))
    }
}

fn parse_count(field: &'static str, raw: Option<&str>, default: i64) -> ApiResult<i64> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::validation(format!("invalid {field} value: {raw}"))),
    }
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List the authenticated user's tasks, filtered, sorted, and paginated
pub async fn list_tasks(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let (filter, pagination) = query.decode()?;
    let window = pagination.window()?;

    info!(
        "Listing tasks for user: {} (page: {})",
        current_user.id, pagination.page
    );

    let (tasks, total) = db
        .task_storage
        .list_tasks(&current_user.id, &filter, window)
        .await?;

    Ok(Json(TaskListResponse {
        tasks,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Get a single task by ID
pub async fn get_task(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    info!("Getting task: {} for user: {}", task_id, current_user.id);

    let task = db.task_storage.get_task(&current_user.id, task_id).await?;
    Ok(Json(task))
}

/// Request body for creating a task
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<Vec<String>>,
}

impl CreateTaskRequest {
    fn validate(self) -> ApiResult<TaskCreateInput> {
        let title = validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        if let Some(names) = &self.tags {
            validate_tag_names(names)?;
        }

        Ok(TaskCreateInput {
            title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
            tags: self.tags,
        })
    }
}

/// Create a new task
pub async fn create_task(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    info!(
        "Creating task '{}' for user: {}",
        request.title, current_user.id
    );

    let input = request.validate()?;
    let task = db.task_storage.create_task(&current_user.id, input).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Request body for partially updating a task
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    fn validate(self) -> ApiResult<TaskUpdateInput> {
        let title = match &self.title {
            Some(raw) => Some(validate_title(raw)?),
            None => None,
        };
        validate_description(self.description.as_deref())?;
        if let Some(names) = &self.tags {
            validate_tag_names(names)?;
        }

        Ok(TaskUpdateInput {
            title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
            tags: self.tags,
        })
    }
}

/// Partially update a task
pub async fn update_task(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    info!("Updating task: {} for user: {}", task_id, current_user.id);

    let input = request.validate()?;
    let task = db
        .task_storage
        .update_task(&current_user.id, task_id, input)
        .await?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(task_id): Path<i64>,
) -> ApiResult<StatusCode> {
    info!("Deleting task: {} for user: {}", task_id, current_user.id);

    db.task_storage.delete_task(&current_user.id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(raw: &str) -> ApiResult<String> {
    let title = raw.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation(format!(
            "title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: Option<&str>) -> ApiResult<()> {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }
    Ok(())
}

fn validate_tag_names(names: &[String]) -> ApiResult<()> {
    for name in names {
        let normalized = normalize_tag_name(name);
        if normalized.is_empty() || normalized.chars().count() > MAX_TAG_NAME_LEN {
            return Err(ApiError::validation(format!(
                "tag name must be between 1 and {MAX_TAG_NAME_LEN} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_defaults() {
        let (filter, pagination) = ListTasksQuery::default().decode().unwrap();
        assert_eq!(filter.completed, None);
        assert!(filter.priorities.is_empty());
        assert!(filter.tag_ids.is_empty());
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort_by, SortField::CreatedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_decode_comma_separated_sets() {
        let query = ListTasksQuery {
            priority: Some("high, low".to_string()),
            tag_ids: Some("3,1".to_string()),
            ..Default::default()
        };
        let (filter, _) = query.decode().unwrap();
        assert_eq!(filter.priorities, vec![TaskPriority::High, TaskPriority::Low]);
        assert_eq!(filter.tag_ids, vec![3, 1]);
    }

    #[test]
    fn test_decode_rejects_bad_tokens_naming_the_field() {
        let err = ListTasksQuery {
            completed: Some("banana".to_string()),
            ..Default::default()
        }
        .decode()
        .unwrap_err();
        assert!(err.to_string().contains("completed"));

        let err = ListTasksQuery {
            priority: Some("urgent".to_string()),
            ..Default::default()
        }
        .decode()
        .unwrap_err();
        assert!(err.to_string().contains("priority"));

        let err = ListTasksQuery {
            sort_by: Some("due_date".to_string()),
            ..Default::default()
        }
        .decode()
        .unwrap_err();
        assert!(err.to_string().contains("sort_by"));

        let err = ListTasksQuery {
            tag_ids: Some("1,x".to_string()),
            ..Default::default()
        }
        .decode()
        .unwrap_err();
        assert!(err.to_string().contains("tag_ids"));
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = ListTasksQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let (filter, _) = query.decode().unwrap();
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_title_validation() {
        assert!(validate_title("  Buy milk  ").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
        assert_eq!(validate_title(" Buy milk ").unwrap(), "Buy milk");
    }

    #[test]
    fn test_tag_name_validation() {
        assert!(validate_tag_names(&["Work".to_string()]).is_ok());
        assert!(validate_tag_names(&["   ".to_string()]).is_err());
        assert!(validate_tag_names(&["y".repeat(MAX_TAG_NAME_LEN + 1)]).is_err());
    }
}
