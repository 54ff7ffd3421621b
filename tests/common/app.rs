use std::sync::Arc;

use axum_test::TestServer;
use folio_api::build_router;
use folio_api::config::{Config, LogFormat, DEFAULT_MAX_BODY_BYTES};
use folio_api::repositories::InMemoryProjectStore;
use folio_api::state::AppState;
use folio_api::storage::InMemoryFileStore;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        storage_public_root: "storage/app/public".into(),
        storage_private_root: "storage/app/private".into(),
        log_format: LogFormat::Pretty,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: InMemoryProjectStore,
    pub files: InMemoryFileStore,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let config = test_config();

        // In-memory stores keep the tests free of Postgres and the filesystem
        let store = InMemoryProjectStore::new();
        let files = InMemoryFileStore::new();

        let state = AppState::with_stores(config, Arc::new(store.clone()), Arc::new(files.clone()));

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            store,
            files,
        }
    }
}
