// ABOUTME: Shared database state handed to request handlers
// ABOUTME: Owns the connection pool and the per-domain storage facades

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use taskdeck_storage::{connect_pool, SessionStorage, StorageError};
use taskdeck_tags::TagStorage;
use taskdeck_tasks::TaskStorage;

/// Application state threaded through the routers. Cheap to clone; the
/// storages share the one pool.
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub task_storage: Arc<TaskStorage>,
    pub tag_storage: Arc<TagStorage>,
    pub session_storage: Arc<SessionStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            session_storage: Arc::new(SessionStorage::new(pool.clone())),
            pool,
        }
    }

    /// Open the database at `path` (creating it if needed) and bring the
    /// schema up to date.
    pub async fn init(path: &Path) -> Result<Self, StorageError> {
        info!("Opening database at {}", path.display());
        let pool = connect_pool(path).await?;
        sqlx::migrate!("../storage/migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}
