pub mod project;
pub mod upload;
pub mod user;

pub use project::*;
pub use upload::*;
pub use user::*;
