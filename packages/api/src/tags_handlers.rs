// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: Covers the per-user tag list, prefix autocomplete, and CRUD

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::{ApiError, ApiResult};
use taskdeck_storage::{PaginationParams, DEFAULT_PER_PAGE};
use taskdeck_tags::{
    normalize_tag_name, Tag, TagCreateInput, DEFAULT_AUTOCOMPLETE_LIMIT, MAX_AUTOCOMPLETE_LIMIT,
    MAX_TAG_NAME_LEN,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListTagsQuery {
    search: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

#[derive(Serialize)]
pub struct TagListResponse {
    pub tags: Vec<Tag>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List the authenticated user's tags, optionally filtered by name prefix
pub async fn list_tags(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Query(query): Query<ListTagsQuery>,
) -> ApiResult<Json<TagListResponse>> {
    let page = parse_count("page", query.page.as_deref(), 1)?;
    let per_page = parse_count("per_page", query.per_page.as_deref(), DEFAULT_PER_PAGE)?;
    let pagination = PaginationParams::new(page, per_page);
    let window = pagination.window()?;

    let prefix = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    info!(
        "Listing tags for user: {} (page: {})",
        current_user.id, pagination.page
    );

    let (tags, total) = db
        .tag_storage
        .list_tags(&current_user.id, prefix, window)
        .await?;

    Ok(Json(TagListResponse {
        tags,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteQuery {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<String>,
}

/// Suggest tag names starting with the given prefix, case-insensitive,
/// ordered by name.
pub async fn autocomplete_tags(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Query(query): Query<AutocompleteQuery>,
) -> ApiResult<Json<AutocompleteResponse>> {
    let prefix = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("q must be at least 1 character"))?;

    let limit = match query.limit.as_deref() {
        None => DEFAULT_AUTOCOMPLETE_LIMIT,
        Some(raw) => {
            let limit = raw
                .parse::<i64>()
                .map_err(|_| ApiError::validation(format!("invalid limit value: {raw}")))?;
            if !(1..=MAX_AUTOCOMPLETE_LIMIT).contains(&limit) {
                return Err(ApiError::validation(format!(
                    "limit must be between 1 and {MAX_AUTOCOMPLETE_LIMIT}, got {limit}"
                )));
            }
            limit
        }
    };

    let suggestions = db
        .tag_storage
        .autocomplete(&current_user.id, prefix, limit)
        .await?;

    Ok(Json(AutocompleteResponse { suggestions }))
}

/// Get a single tag by ID
pub async fn get_tag(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(tag_id): Path<i64>,
) -> ApiResult<Json<Tag>> {
    info!("Getting tag: {} for user: {}", tag_id, current_user.id);

    let tag = db.tag_storage.get_tag(&current_user.id, tag_id).await?;
    Ok(Json(tag))
}

/// Request body for creating a tag
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Create a new tag; a per-user duplicate name is a conflict
pub async fn create_tag(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<impl IntoResponse> {
    let normalized = normalize_tag_name(&request.name);
    if normalized.is_empty() || normalized.chars().count() > MAX_TAG_NAME_LEN {
        return Err(ApiError::validation(format!(
            "tag name must be between 1 and {MAX_TAG_NAME_LEN} characters"
        )));
    }

    info!("Creating tag '{}' for user: {}", normalized, current_user.id);

    let tag = db
        .tag_storage
        .create_tag(&current_user.id, TagCreateInput { name: request.name })
        .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Delete a tag; its task associations go with it, the tasks stay
pub async fn delete_tag(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(tag_id): Path<i64>,
) -> ApiResult<StatusCode> {
    info!("Deleting tag: {} for user: {}", tag_id, current_user.id);

    db.tag_storage.delete_tag(&current_user.id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_count(field: &'static str, raw: Option<&str>, default: i64) -> ApiResult<i64> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::validation(format!("invalid {field} value: {raw}"))),
    }
}
