use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::repositories::{ProjectRepository, ProjectStore};
use crate::services::ProjectService;
use crate::storage::{FileStore, LocalFileStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub projects: ProjectService,
}

impl AppState {
    /// Connect to Postgres, run migrations and use local disk for uploads
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database_url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;
        pg_pool.close().await;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(100)
            .min_connections(5)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        let store: Arc<dyn ProjectStore> = Arc::new(ProjectRepository::new(db));
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(
            config.storage_public_root.clone(),
            config.storage_private_root.clone(),
        ));

        Ok(Self::with_stores(config, store, files))
    }

    /// Create AppState with custom stores (for testing)
    pub fn with_stores(
        config: Config,
        store: Arc<dyn ProjectStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            config,
            projects: ProjectService::new(store, files),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
