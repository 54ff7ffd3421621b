use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProject, NewProject, Project, ProjectChanges, UpdateProject, UploadedFile, User,
};
use crate::repositories::ProjectStore;
use crate::storage::{FileStore, Visibility};
use crate::validation::{self, normalize, ValidationErrors, TITLE_MAX_CHARS};

/// Directory, under the public tier, that project images are written to
pub const IMAGE_DIRECTORY: &str = "projects";

/// Validates project requests and applies them to the record and file stores
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    files: Arc<dyn FileStore>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Every project, in insertion order
    pub async fn list(&self) -> AppResult<Vec<Project>> {
        self.store.list().await
    }

    /// Create a project owned by `user_id`.
    ///
    /// Nothing is written unless the caller is known and every field is valid.
    /// The image, if any, is stored before the record so a record never points
    /// at a file that failed to write.
    pub async fn create(
        &self,
        input: CreateProject,
        user_id: Option<i64>,
        image: Option<UploadedFile>,
    ) -> AppResult<Project> {
        let user_id = user_id.ok_or(AppError::Unauthorized)?;

        // An empty file part is what a form sends when no file was chosen
        let image = image.filter(|f| !(f.client_name().is_empty() && f.data.is_empty()));

        let mut new_project = validate_create(input, user_id, image.as_ref())?;

        let stored_path = match &image {
            Some(file) => Some(self.store_image(file).await?),
            None => None,
        };
        new_project.image = stored_path.clone();

        match self.store.insert(new_project).await {
            Ok(project) => {
                tracing::info!(
                    project_id = project.id,
                    user_id,
                    image = ?project.image,
                    "Created project"
                );
                Ok(project)
            }
            Err(err) => {
                if let Some(path) = stored_path {
                    if let Err(cleanup) = self.files.delete_file(&path, Visibility::Public).await {
                        tracing::warn!(%path, error = %cleanup, "Failed to remove image after insert error");
                    }
                }
                Err(err)
            }
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Project> {
        self.store.find_by_id(id).await
    }

    /// Apply the fields present in `input`; absent fields keep their value
    pub async fn update(&self, id: i64, input: UpdateProject) -> AppResult<Project> {
        let current = self.store.find_by_id(id).await?;

        let changes = validate_update(input)?.without_unchanged(&current);
        if changes.is_empty() {
            return Ok(current);
        }

        let project = self.store.update(id, &changes).await?;
        tracing::info!(project_id = id, "Updated project");
        Ok(project)
    }

    /// Hard delete. A stored image file stays where it is.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let project = self.store.find_by_id(id).await?;
        self.store.delete(project.id).await?;

        tracing::info!(project_id = id, image = ?project.image, "Deleted project");
        Ok(())
    }

    /// The user a project belongs to
    pub async fn owner(&self, id: i64) -> AppResult<User> {
        let project = self.store.find_by_id(id).await?;
        self.store
            .find_owner(&project)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    async fn store_image(&self, file: &UploadedFile) -> AppResult<String> {
        let filename = format!(
            "{}_{}",
            OffsetDateTime::now_utc().unix_timestamp(),
            file.client_name()
        );

        self.files
            .store_file(&file.data, IMAGE_DIRECTORY, &filename, Visibility::Public)
            .await
            .map_err(|e| match e {
                AppError::Upload(_) => e,
                other => AppError::Upload(other.to_string()),
            })
    }
}

fn validate_create(
    input: CreateProject,
    user_id: i64,
    image: Option<&UploadedFile>,
) -> AppResult<NewProject> {
    let title = normalize(input.title);
    let description = normalize(input.description);
    let link = normalize(input.link);

    let mut errors = ValidationErrors::new();

    if let Some(title) = validation::required(&mut errors, "title", title.as_deref()) {
        validation::max_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
    }
    if let Some(link) = &link {
        validation::url(&mut errors, "link", link);
    }
    if let Some(file) = image {
        validation::image_upload(&mut errors, "image", file);
    }

    errors.into_result()?;

    Ok(NewProject {
        title: title.unwrap_or_default(),
        description,
        image: None,
        link,
        user_id,
    })
}

fn validate_update(input: UpdateProject) -> AppResult<ProjectChanges> {
    let title = input.title.map(normalize);
    let description = input.description.map(normalize);
    let image = input.image.map(normalize);
    let link = input.link.map(normalize);

    let mut errors = ValidationErrors::new();

    // Optional, but when sent it must hold a real title
    if let Some(title) = &title {
        if let Some(title) = validation::required(&mut errors, "title", title.as_deref()) {
            validation::max_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
        }
    }
    if let Some(Some(link)) = &link {
        validation::url(&mut errors, "link", link);
    }

    errors.into_result()?;

    Ok(ProjectChanges {
        title: title.flatten(),
        description,
        image,
        link,
    })
}
