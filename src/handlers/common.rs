use serde::Serialize;
use utoipa::ToSchema;

/// Plain confirmation body, e.g. `{"message": "Project deleted successfully"}`
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
