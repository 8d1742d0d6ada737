use crate::domain::ErrorPayload;
use crate::storage::StoreError;
use thiserror::Error;

/// Every failure a bird endpoint can end in.
///
/// Turned into a status code and body in exactly one place
/// (`transport::http::error`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bird not found")]
    NotFound,

    #[error("validation failed")]
    Unprocessable(ErrorPayload),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}
