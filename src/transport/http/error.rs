//! The boundary handler: the only place an [`ApiError`] becomes a status and body.

use crate::app::ApiError;
use crate::transport::http::types::{ErrorResponse, ValidationErrorResponse, NOT_FOUND_MESSAGE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(NOT_FOUND_MESSAGE)),
            )
                .into_response(),
            ApiError::Unprocessable(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response(),
            ApiError::InvalidBody(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(format!("Invalid JSON body: {}", reason))),
            )
                .into_response(),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "bird store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorShape, ValidationErrors};
    use crate::storage::StoreError;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");

        let cases = [
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Unprocessable(errors.into_payload(ErrorShape::Messages)),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::InvalidBody("EOF".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::from(StoreError::NotFound(7)), StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn unprocessable_body_keeps_rule_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("species", "is invalid");
        errors.add("likes", "is not a number");

        let response = ApiError::Unprocessable(errors.into_payload(ErrorShape::Messages))
            .into_response();

        assert_eq!(
            body_text(response).await,
            r#"{"errors":{"name":["can't be blank"],"species":["is invalid"],"likes":["is not a number"]}}"#
        );
    }

    #[tokio::test]
    async fn not_found_body() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(body_text(response).await, r#"{"error":"Bird not found"}"#);
    }
}
