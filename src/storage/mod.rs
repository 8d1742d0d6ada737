//! Persistence for birds.
//!
//! The [`BirdStore`] trait is the only thing handlers know about storage. Both
//! write operations run the bird's rule set themselves and hand back a
//! [`ValidationResult`], so a failed validation is a value, not an error.

use crate::domain::{Bird, BirdParams, ValidationResult};
use crate::infra::Config;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryBirdStore;
pub use postgres::PgBirdStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The row was removed between lookup and write.
    #[error("bird {0} no longer exists")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BirdStore: Send + Sync {
    /// Human-readable backend name for logs.
    fn backend(&self) -> &'static str;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bird>>;

    /// All birds ordered by id.
    async fn list_all(&self) -> StoreResult<Vec<Bird>>;

    /// Validates `params` as a new bird and commits it if every rule passes.
    async fn create(&self, params: &BirdParams) -> StoreResult<ValidationResult<Bird>>;

    /// Validates `params` applied over `bird` and commits if every rule passes.
    async fn update(&self, bird: &Bird, params: &BirdParams)
        -> StoreResult<ValidationResult<Bird>>;

    async fn delete(&self, bird: &Bird) -> StoreResult<()>;

    /// Liveness check used by `/health`.
    async fn ping(&self) -> StoreResult<()>;
}

/// Postgres when `DATABASE_URL` is configured, otherwise the in-memory store.
pub async fn from_config(config: &Config) -> StoreResult<Arc<dyn BirdStore>> {
    match config.database_url.as_deref() {
        Some(url) => Ok(Arc::new(
            PgBirdStore::connect(url, config.max_connections).await?,
        )),
        None => Ok(Arc::new(MemoryBirdStore::new())),
    }
}
