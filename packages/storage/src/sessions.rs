// ABOUTME: Session lookup for bearer-credential validation
// ABOUTME: Session issuance happens outside this service; we only verify tokens

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::StorageError;

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up the user owning `token`. Returns `None` for unknown or
    /// expired tokens.
    pub async fn verify_token(&self, token: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT user_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let Some(row) = row else {
            debug!("Unknown session token");
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
        if expires_at <= Utc::now() {
            debug!("Session token expired at {}", expires_at);
            return Ok(None);
        }

        Ok(Some(row.try_get("user_id")?))
    }
}
