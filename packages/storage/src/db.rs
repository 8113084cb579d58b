// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and every storage layer

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::alerts::AlertStorage;
use crate::aqi::AqiStorage;
use crate::broadcasts::BroadcastStorage;
use crate::health::HealthStorage;
use crate::policies::PolicyStorage;
use crate::reports::ReportStorage;
use crate::rewards::RewardStorage;
use crate::tasks::TaskStorage;
use crate::users::UserStorage;
use crate::wards::WardStorage;
use crate::StorageError;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub ward_storage: Arc<WardStorage>,
    pub aqi_storage: Arc<AqiStorage>,
    pub alert_storage: Arc<AlertStorage>,
    pub broadcast_storage: Arc<BroadcastStorage>,
    pub task_storage: Arc<TaskStorage>,
    pub policy_storage: Arc<PolicyStorage>,
    pub reward_storage: Arc<RewardStorage>,
    pub report_storage: Arc<ReportStorage>,
    pub health_storage: Arc<HealthStorage>,
    pub user_storage: Arc<UserStorage>,
}

impl DbState {
    /// Create new database state from an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            ward_storage: Arc::new(WardStorage::new(pool.clone())),
            aqi_storage: Arc::new(AqiStorage::new(pool.clone())),
            alert_storage: Arc::new(AlertStorage::new(pool.clone())),
            broadcast_storage: Arc::new(BroadcastStorage::new(pool.clone())),
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            policy_storage: Arc::new(PolicyStorage::new(pool.clone())),
            reward_storage: Arc::new(RewardStorage::new(pool.clone())),
            report_storage: Arc::new(ReportStorage::new(pool.clone())),
            health_storage: Arc::new(HealthStorage::new(pool.clone())),
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            pool,
        }
    }

    /// Initialize database state, defaulting to `~/.airwatch/airwatch.db`
    pub async fn init_with_path(database_path: Option<PathBuf>) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(airwatch_core::database_file);

        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());

        debug!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        info!("Database connection established at {}", database_path.display());

        Self::migrate(&pool).await?;

        Ok(Self::new(pool))
    }

    /// Apply embedded migrations
    pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(StorageError::Migration)?;

        debug!("Database migrations completed");
        Ok(())
    }
}
