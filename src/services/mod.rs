pub mod auth;
pub mod project;

pub use auth::{AuthService, Claims};
pub use project::{ProjectService, IMAGE_DIRECTORY};
