pub mod common;
pub mod project;

pub use common::MessageResponse;
pub use project::{
    create_project, delete_project, get_project, get_project_owner, list_projects,
    update_project, CreateProjectForm, CreateProjectRequest, CreateProjectUpload,
    ProjectId, ProjectResponse, UpdateProjectBody, UpdateProjectRequest,
};
