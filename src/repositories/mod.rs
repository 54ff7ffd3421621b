pub mod memory;
pub mod project;

pub use memory::InMemoryProjectStore;
pub use project::ProjectRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewProject, Project, ProjectChanges, User};

/// Record store for projects.
/// Missing ids are reported as `AppError::NotFound("Project")`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Find project by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Project>;

    /// Every project, in insertion order
    async fn list(&self) -> AppResult<Vec<Project>>;

    /// Insert a validated project, assigning id and timestamps
    async fn insert(&self, input: NewProject) -> AppResult<Project>;

    /// Apply a partial update and bump `updated_at`
    async fn update(&self, id: i64, changes: &ProjectChanges) -> AppResult<Project>;

    /// Delete project by ID
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// The user a project belongs to
    async fn find_owner(&self, project: &Project) -> AppResult<Option<User>>;
}
