//! In-process store used when no `DATABASE_URL` is configured, and by tests.

use super::{BirdStore, StoreError, StoreResult};
use crate::domain::{Bird, BirdParams, Changeset, ValidationResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    birds: BTreeMap<i64, Bird>,
}

impl Inner {
    fn name_taken(&self, name: Option<&str>, except: Option<i64>) -> bool {
        let Some(name) = name else {
            return false;
        };
        self.birds
            .values()
            .any(|b| b.name == name && Some(b.id) != except)
    }
}

/// Birds kept in a `BTreeMap` behind one lock.
///
/// Writes hold the write guard across validation and commit, so the uniqueness
/// check and the insert cannot interleave with another write.
#[derive(Default)]
pub struct MemoryBirdStore {
    inner: RwLock<Inner>,
}

impl MemoryBirdStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BirdStore for MemoryBirdStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bird>> {
        Ok(self.inner.read().await.birds.get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Bird>> {
        Ok(self.inner.read().await.birds.values().cloned().collect())
    }

    async fn create(&self, params: &BirdParams) -> StoreResult<ValidationResult<Bird>> {
        let mut inner = self.inner.write().await;
        let changeset = Changeset::for_create(params);
        let taken = inner.name_taken(changeset.name_to_check(), None);

        let attrs = match changeset.validate(taken) {
            ValidationResult::Success(attrs) => attrs,
            ValidationResult::Failure(errors) => return Ok(ValidationResult::Failure(errors)),
        };

        inner.last_id += 1;
        let now = Utc::now();
        let bird = Bird {
            id: inner.last_id,
            name: attrs.name,
            species: attrs.species,
            likes: attrs.likes,
            created_at: now,
            updated_at: now,
        };
        inner.birds.insert(bird.id, bird.clone());
        Ok(ValidationResult::Success(bird))
    }

    async fn update(
        &self,
        bird: &Bird,
        params: &BirdParams,
    ) -> StoreResult<ValidationResult<Bird>> {
        let mut inner = self.inner.write().await;
        let current = inner
            .birds
            .get(&bird.id)
            .cloned()
            .ok_or(StoreError::NotFound(bird.id))?;

        let changeset = Changeset::for_update(&current, params);
        let taken = inner.name_taken(changeset.name_to_check(), Some(current.id));

        let attrs = match changeset.validate(taken) {
            ValidationResult::Success(attrs) => attrs,
            ValidationResult::Failure(errors) => return Ok(ValidationResult::Failure(errors)),
        };

        let updated_at = if attrs.differs_from(&current) {
            Utc::now()
        } else {
            current.updated_at
        };
        let updated = Bird {
            name: attrs.name,
            species: attrs.species,
            likes: attrs.likes,
            updated_at,
            ..current
        };
        inner.birds.insert(updated.id, updated.clone());
        Ok(ValidationResult::Success(updated))
    }

    async fn delete(&self, bird: &Bird) -> StoreResult<()> {
        self.inner.write().await.birds.remove(&bird.id);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
