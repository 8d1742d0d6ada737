use crate::app::BirdService;
use crate::domain::ErrorPayload;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub birds: BirdService,
}

impl AppState {
    pub fn new(birds: BirdService) -> Self {
        Self { birds }
    }
}

/// Writable bird attributes. Unknown keys are ignored.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct BirdRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub likes: Option<i32>,
}

/// Body of 404 and malformed-request responses.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Body of a 422 validation failure.
///
/// Serialized straight from the payload so the attribute keys keep rule order.
#[derive(Serialize, Debug, ToSchema)]
pub struct ValidationErrorResponse {
    /// Either `{"name": ["can't be blank"]}` or `["Name can't be blank"]`,
    /// depending on the server's `ERROR_FORMAT`.
    #[schema(value_type = Object)]
    pub errors: ErrorPayload,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub const NOT_FOUND_MESSAGE: &str = "Bird not found";
