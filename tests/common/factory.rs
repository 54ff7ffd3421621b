use std::sync::atomic::{AtomicI64, Ordering};

use time::{Duration, OffsetDateTime};

use folio_api::models::{CreateProject, Project, User};
use folio_api::services::AuthService;

use super::TestApp;

static NEXT_USER_ID: AtomicI64 = AtomicI64::new(1);

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: i64,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    app: &'a TestApp,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(app: &'a TestApp) -> Self {
        Self { app }
    }

    /// Register a test user and return auth info
    pub async fn create_user(&self) -> TestAuth {
        let user_id = NEXT_USER_ID.fetch_add(1, Ordering::SeqCst);
        let email = format!("test-{}@example.com", user_id);
        let now = OffsetDateTime::now_utc();

        self.app
            .store
            .add_user(User {
                id: user_id,
                name: format!("Test User {}", user_id),
                email: email.clone(),
                created_at: now,
                updated_at: now,
            })
            .await;

        let token = AuthService::generate_token(
            user_id,
            &email,
            Duration::hours(1),
            &self.app.state.config,
        )
        .unwrap();

        TestAuth {
            user_id,
            email,
            token,
        }
    }

    /// Create a test project
    pub async fn create_project(&self, user_id: i64) -> Project {
        let input = CreateProject {
            title: Some("Test Project".to_string()),
            description: Some("Test project description".to_string()),
            link: Some("https://example.com".to_string()),
        };

        self.app
            .state
            .projects
            .create(input, Some(user_id), None)
            .await
            .unwrap()
    }

    /// Create a test project with specific title
    pub async fn create_project_with_title(&self, user_id: i64, title: &str) -> Project {
        let input = CreateProject {
            title: Some(title.to_string()),
            ..Default::default()
        };

        self.app
            .state
            .projects
            .create(input, Some(user_id), None)
            .await
            .unwrap()
    }
}
