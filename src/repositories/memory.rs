use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{NewProject, Project, ProjectChanges, User};
use crate::repositories::ProjectStore;

/// In-memory project store for tests and local runs without Postgres
#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    inner: Arc<Mutex<InMemoryProjectStoreInner>>,
}

#[derive(Default)]
struct InMemoryProjectStoreInner {
    next_id: i64,
    // BTreeMap keeps ids, and therefore insertion order, sorted
    projects: BTreeMap<i64, Project>,
    users: HashMap<i64, User>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so `find_owner` can resolve it
    pub async fn add_user(&self, user: User) {
        let mut inner = self.inner.lock().await;
        inner.users.insert(user.id, user);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.projects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Project".to_string())
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Project> {
        let inner = self.inner.lock().await;
        inner.projects.get(&id).cloned().ok_or_else(not_found)
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let inner = self.inner.lock().await;
        Ok(inner.projects.values().cloned().collect())
    }

    async fn insert(&self, input: NewProject) -> AppResult<Project> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;

        let now = time::OffsetDateTime::now_utc();
        let project = Project {
            id: inner.next_id,
            title: input.title,
            description: input.description,
            image: input.image,
            link: input.link,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };

        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: i64, changes: &ProjectChanges) -> AppResult<Project> {
        let mut inner = self.inner.lock().await;
        let project = inner.projects.get_mut(&id).ok_or_else(not_found)?;

        changes.apply_to(project);
        project.updated_at = time::OffsetDateTime::now_utc();

        Ok(project.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner.projects.remove(&id).map(|_| ()).ok_or_else(not_found)
    }

    async fn find_owner(&self, project: &Project) -> AppResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&project.user_id).cloned())
    }
}
