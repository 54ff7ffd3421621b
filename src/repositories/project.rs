use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::entity::project::{self, ActiveModel, Column, Entity as ProjectEntity};
use crate::entity::user::{self, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::models::{NewProject, Project, ProjectChanges, User};
use crate::repositories::ProjectStore;

/// Project repository backed by Postgres through SeaORM
#[derive(Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i64) -> AppResult<project::Model> {
        ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Project> {
        Ok(self.find_model(id).await?.into())
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn insert(&self, input: NewProject) -> AppResult<Project> {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            image: Set(input.image),
            link: Set(input.link),
            user_id: Set(input.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into())
    }

    async fn update(&self, id: i64, changes: &ProjectChanges) -> AppResult<Project> {
        let model = self.find_model(id).await?;

        let mut active: ActiveModel = model.into();

        if let Some(title) = &changes.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
        }
        if let Some(image) = &changes.image {
            active.image = Set(image.clone());
        }
        if let Some(link) = &changes.link {
            active.link = Set(link.clone());
        }
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => AppError::NotFound("Project".to_string()),
            other => other.into(),
        })?;
        Ok(result.into())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = ProjectEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Project".to_string()));
        }

        Ok(())
    }

    async fn find_owner(&self, project: &Project) -> AppResult<Option<User>> {
        let owner = UserEntity::find()
            .join(JoinType::InnerJoin, user::Relation::Projects.def())
            .filter(Column::Id.eq(project.id))
            .one(&self.db)
            .await?;

        Ok(owner.map(|m| m.into()))
    }
}

// Conversion from SeaORM models to our domain models
impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image: m.image,
            link: m.link,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
