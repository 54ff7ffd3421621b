use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, request::Parts, StatusCode},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::MessageResponse;
use crate::middlewares::AuthUser;
use crate::models::{CreateProject, Project, UpdateProject, UploadedFile, UserResponse};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl From<CreateProjectRequest> for CreateProject {
    fn from(r: CreateProjectRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            link: r.link,
        }
    }
}

/// Multipart form accepted by `POST /api/projects` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateProjectUpload {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    /// jpeg, png, jpg or gif, at most 2048 KB
    #[schema(value_type = Option<String>)]
    pub image: Option<Vec<u8>>,
}

/// Fields left out are not touched; `null` clears a nullable field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Storage path; files can only be uploaded on create
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub link: Option<Option<String>>,
}

// Runs only for keys that are in the body, turning `null` into `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateProjectRequest> for UpdateProject {
    fn from(r: UpdateProjectRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            image: r.image,
            link: r.link,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            image: p.image,
            link: p.link,
            user_id: p.user_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ============ Extractors ============

const CREATE_FIELDS: [&str; 3] = ["title", "description", "link"];
const UPDATE_FIELDS: [&str; 4] = ["title", "description", "image", "link"];

/// Project id from the path. Ids that cannot name a row are a 404.
#[derive(Debug, Clone, Copy)]
pub struct ProjectId(pub i64);

impl<S> FromRequestParts<S> for ProjectId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|_| AppError::NotFound("Project".to_string()))
    }
}

/// Create payload, sent either as JSON or as `multipart/form-data` with an
/// optional `image` file part
#[derive(Debug)]
pub struct CreateProjectForm {
    pub fields: CreateProject,
    pub image: Option<UploadedFile>,
}

impl<S> FromRequest<S> for CreateProjectForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await
        } else {
            let payload: CreateProjectRequest = read_json(req, state, &CREATE_FIELDS).await?;
            Ok(Self {
                fields: payload.into(),
                image: None,
            })
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> AppResult<CreateProjectForm> {
    let mut fields = CreateProject::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                image = Some(UploadedFile {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "title" | "description" | "link" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "title" => fields.title = Some(text),
                    "description" => fields.description = Some(text),
                    _ => fields.link = Some(text),
                }
            }
            _ => {} // ignore unknown fields, including any user_id
        }
    }

    Ok(CreateProjectForm { fields, image })
}

/// Update payload
#[derive(Debug)]
pub struct UpdateProjectBody(pub UpdateProjectRequest);

impl<S> FromRequest<S> for UpdateProjectBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_json(req, state, &UPDATE_FIELDS).await.map(Self)
    }
}

// Field types are checked on the raw value first so a wrong type is reported
// under the field's own name.
async fn read_json<T, S>(req: Request, state: &S, fields: &[&str]) -> AppResult<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let Json(body) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut errors = ValidationErrors::new();
    validation::string_fields(&mut errors, &body, fields);
    errors.into_result()?;

    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

// ============ Handlers ============

/// List every project
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "All projects in insertion order", body = [ProjectResponse])
    ),
    tag = "Projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = state.projects.list().await?;
    Ok(Json(projects.into_iter().map(|p| p.into()).collect()))
}

/// Create a new project owned by the caller
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body(content(
        (CreateProjectRequest = "application/json"),
        (CreateProjectUpload = "multipart/form-data")
    )),
    responses(
        (status = 201, description = "Project created successfully", body = ProjectResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Validation error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    form: CreateProjectForm,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let project = state
        .projects
        .create(form.fields, user.map(|u| u.id), form.image)
        .await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.projects.get(id).await?;
    Ok(Json(project.into()))
}

/// Update a project (PUT and PATCH both apply a partial update)
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
    body: Result<UpdateProjectBody, AppError>,
) -> AppResult<Json<ProjectResponse>> {
    // An unknown project is reported ahead of anything wrong with the body
    let UpdateProjectBody(payload) = match body {
        Ok(body) => body,
        Err(err) => {
            state.projects.get(id).await?;
            return Err(err);
        }
    };

    let project = state.projects.update(id, payload.into()).await?;
    Ok(Json(project.into()))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted successfully", body = MessageResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<MessageResponse>> {
    state.projects.delete(id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

/// Get the user a project belongs to
#[utoipa::path(
    get,
    path = "/api/projects/{id}/owner",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project owner", body = UserResponse),
        (status = 404, description = "Project or owner not found")
    ),
    tag = "Projects"
)]
pub async fn get_project_owner(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<UserResponse>> {
    let owner = state.projects.owner(id).await?;
    Ok(Json(owner.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let request: UpdateProjectRequest =
            serde_json::from_value(json!({ "description": null, "link": "https://x.dev" }))
                .unwrap();

        assert_eq!(request.title, None);
        assert_eq!(request.description, Some(None));
        assert_eq!(request.image, None);
        assert_eq!(request.link, Some(Some("https://x.dev".to_string())));
    }

    #[test]
    fn test_create_request_ignores_user_id() {
        let request: CreateProjectRequest =
            serde_json::from_value(json!({ "title": "A", "user_id": 999 })).unwrap();
        let fields: CreateProject = request.into();
        assert_eq!(fields.title.as_deref(), Some("A"));
    }
}
