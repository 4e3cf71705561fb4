// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the bearer token to a user before any handler runs

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::db::DbState;
use crate::error::ApiError;

/// Current authenticated user, resolved from the `Authorization: Bearer`
/// header against the sessions table.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl FromRequestParts<DbState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &DbState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        match state.session_storage.verify_token(token).await? {
            Some(user_id) => Ok(CurrentUser { id: user_id }),
            None => {
                debug!("Rejected request with unknown or expired session token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
