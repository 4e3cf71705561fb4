// ABOUTME: HTTP API layer for Taskdeck providing REST endpoints and routing
// ABOUTME: Integration layer that depends on the domain packages

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub mod auth;
pub mod db;
pub mod error;
pub mod tags_handlers;
pub mod tasks_handlers;

pub use auth::CurrentUser;
pub use db::DbState;
pub use error::{ApiError, ApiResult};

/// Creates the tasks API router (nested under /api/v1/tasks)
pub fn create_tasks_router() -> Router<DbState> {
    Router::new()
        .route("/", get(tasks_handlers::list_tasks))
        .route("/", post(tasks_handlers::create_task))
        .route("/{id}", get(tasks_handlers::get_task))
        .route("/{id}", patch(tasks_handlers::update_task))
        .route("/{id}", delete(tasks_handlers::delete_task))
}

/// Creates the tags API router (nested under /api/v1/tags)
pub fn create_tags_router() -> Router<DbState> {
    Router::new()
        .route("/", get(tags_handlers::list_tags))
        .route("/", post(tags_handlers::create_tag))
        .route("/autocomplete", get(tags_handlers::autocomplete_tags))
        .route("/{id}", get(tags_handlers::get_tag))
        .route("/{id}", delete(tags_handlers::delete_tag))
}
