use crate::app::ApiError;
use crate::domain::BirdParams;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value as JsonValue;

/// Unwraps a JSON body and filters it down to the permitted bird attributes.
///
/// Malformed JSON and non-object bodies are both `InvalidBody` (422).
pub fn permitted_params(
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<BirdParams, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    BirdParams::permit(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}
