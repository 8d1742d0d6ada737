use crate::app::ApiError;
use crate::domain::Bird;
use crate::transport::http::handlers::common::permitted_params;
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/birds",
    responses(
        (status = 200, description = "All birds, ordered by id", body = [Bird])
    )
)]
pub async fn index_handler(State(state): State<AppState>) -> Result<Json<Vec<Bird>>, ApiError> {
    Ok(Json(state.birds.list().await?))
}

#[utoipa::path(
    post,
    path = "/birds",
    request_body = crate::transport::http::types::BirdRequest,
    responses(
        (status = 201, description = "Bird created", body = Bird),
        (status = 422, description = "Validation failed", body = crate::transport::http::types::ValidationErrorResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<Bird>), ApiError> {
    let params = permitted_params(body)?;
    let bird = state.birds.create(&params).await?;
    Ok((StatusCode::CREATED, Json(bird)))
}

#[utoipa::path(
    get,
    path = "/birds/{id}",
    params(
        ("id" = String, Path, description = "Bird id")
    ),
    responses(
        (status = 200, description = "The bird", body = Bird),
        (status = 404, description = "Bird not found", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn show_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bird>, ApiError> {
    Ok(Json(state.birds.find(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/birds/{id}",
    params(
        ("id" = String, Path, description = "Bird id")
    ),
    request_body = crate::transport::http::types::BirdRequest,
    responses(
        (status = 200, description = "Bird updated", body = Bird),
        (status = 404, description = "Bird not found", body = crate::transport::http::types::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::transport::http::types::ValidationErrorResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<Bird>, ApiError> {
    let bird = state.birds.find(&id).await?;
    let params = permitted_params(body)?;
    Ok(Json(state.birds.update(&bird, &params).await?))
}

#[utoipa::path(
    delete,
    path = "/birds/{id}",
    params(
        ("id" = String, Path, description = "Bird id")
    ),
    responses(
        (status = 204, description = "Bird destroyed"),
        (status = 404, description = "Bird not found", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn destroy_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let bird = state.birds.find(&id).await?;
    state.birds.destroy(&bird).await?;
    Ok(StatusCode::NO_CONTENT)
}
