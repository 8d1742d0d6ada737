//! The bird service.
//!
//! Sits between the HTTP handlers and the [`BirdStore`]. It is responsible for:
//! 1.  Resolving an `:id` path token to a bird, or `ApiError::NotFound`.
//! 2.  Turning a store `ValidationResult` into either the bird or a 422 payload
//!     in the deployment's configured [`ErrorShape`].

use crate::app::error::ApiError;
use crate::domain::{Bird, BirdParams, ErrorShape, ValidationResult};
use crate::storage::BirdStore;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct BirdService {
    store: Arc<dyn BirdStore>,
    error_shape: ErrorShape,
}

impl BirdService {
    pub fn new(store: Arc<dyn BirdStore>, error_shape: ErrorShape) -> Self {
        Self { store, error_shape }
    }

    pub fn store(&self) -> &Arc<dyn BirdStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Bird>, ApiError> {
        Ok(self.store.list_all().await?)
    }

    /// Lookup-or-404 shared by show, update and destroy.
    ///
    /// The id is an opaque path token: anything that is not the canonical
    /// decimal form of a known id is simply not found.
    pub async fn find(&self, id: &str) -> Result<Bird, ApiError> {
        let Some(id) = parse_id(id) else {
            debug!(id, "bird id is not canonical");
            return Err(ApiError::NotFound);
        };
        match self.store.find_by_id(id).await? {
            Some(bird) => Ok(bird),
            None => {
                debug!(id, "bird not found");
                Err(ApiError::NotFound)
            }
        }
    }

    pub async fn create(&self, params: &BirdParams) -> Result<Bird, ApiError> {
        let result = self.store.create(params).await?;
        let bird = self.outcome(result)?;
        info!(id = bird.id, name = %bird.name, "bird created");
        Ok(bird)
    }

    pub async fn update(&self, bird: &Bird, params: &BirdParams) -> Result<Bird, ApiError> {
        let result = self.store.update(bird, params).await?;
        let bird = self.outcome(result)?;
        info!(id = bird.id, "bird updated");
        Ok(bird)
    }

    pub async fn destroy(&self, bird: &Bird) -> Result<(), ApiError> {
        self.store.delete(bird).await?;
        info!(id = bird.id, "bird destroyed");
        Ok(())
    }

    fn outcome(&self, result: ValidationResult<Bird>) -> Result<Bird, ApiError> {
        match result {
            ValidationResult::Success(bird) => Ok(bird),
            ValidationResult::Failure(errors) => {
                debug!(attributes = errors.len(), "bird rejected by validation");
                Err(ApiError::Unprocessable(errors.into_payload(self.error_shape)))
            }
        }
    }
}

/// Accepts ASCII digits only, without sign, padding or leading zeros, so each
/// bird has exactly one path token.
fn parse_id(token: &str) -> Option<i64> {
    let canonical = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if !canonical {
        return None;
    }
    token.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorPayload;
    use crate::storage::MemoryBirdStore;
    use serde_json::json;

    fn service(shape: ErrorShape) -> BirdService {
        BirdService::new(Arc::new(MemoryBirdStore::new()), shape)
    }

    fn params(v: serde_json::Value) -> BirdParams {
        BirdParams::permit(v).unwrap()
    }

    #[tokio::test]
    async fn find_treats_non_numeric_ids_as_missing() {
        let svc = service(ErrorShape::Messages);
        assert!(matches!(svc.find("abc").await, Err(ApiError::NotFound)));
        assert!(matches!(svc.find("42").await, Err(ApiError::NotFound)));
    }

    #[test]
    fn parse_id_accepts_canonical_decimal_only() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("9223372036854775807"), Some(i64::MAX));
        for token in ["", "+1", "-1", "01", "00", " 1", "1 ", "1.0", "١", "9223372036854775808"] {
            assert_eq!(parse_id(token), None, "token {:?}", token);
        }
    }

    #[tokio::test]
    async fn find_does_not_alias_ids() {
        let svc = service(ErrorShape::Messages);
        let ruby = svc.create(&params(json!({ "name": "Ruby" }))).await.unwrap();
        assert_eq!(ruby.id, 1);

        assert_eq!(svc.find("1").await.unwrap(), ruby);
        for token in ["+1", "01", " 1", "1 "] {
            assert!(
                matches!(svc.find(token).await, Err(ApiError::NotFound)),
                "token {:?}",
                token
            );
        }
    }

    #[tokio::test]
    async fn failure_uses_configured_shape() {
        let svc = service(ErrorShape::FullMessages);
        let err = svc.create(&params(json!({ "likes": 1 }))).await.unwrap_err();
        match err {
            ApiError::Unprocessable(ErrorPayload::FullMessages(messages)) => {
                assert_eq!(messages, vec!["Name can't be blank".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_then_find_round_trip() {
        let svc = service(ErrorShape::Messages);
        let ruby = svc.create(&params(json!({ "name": "Ruby" }))).await.unwrap();
        let found = svc.find(&ruby.id.to_string()).await.unwrap();
        let updated = svc
            .update(&found, &params(json!({ "species": "Archilochus colubris" })))
            .await
            .unwrap();
        assert_eq!(updated.species.as_deref(), Some("Archilochus colubris"));

        svc.destroy(&updated).await.unwrap();
        assert!(matches!(
            svc.update(&updated, &params(json!({ "likes": 1 }))).await,
            Err(ApiError::NotFound)
        ));
    }
}
