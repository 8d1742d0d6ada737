//! PostgreSQL-backed bird store.

use super::{BirdStore, StoreError, StoreResult};
use crate::domain::{Bird, BirdParams, Changeset, ValidationErrors, ValidationResult};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgExecutor, PgPool, Row};

const BIRD_COLUMNS: &str = "id, name, species, likes, created_at, updated_at";

/// Postgres error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgBirdStore {
    pool: PgPool,
}

impl PgBirdStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool and applies the embedded migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

async fn name_taken<'e>(
    executor: impl PgExecutor<'e>,
    name: Option<&str>,
    except: Option<i64>,
) -> StoreResult<bool> {
    let Some(name) = name else {
        return Ok(false);
    };
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM birds WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
        )",
    )
    .bind(name)
    .bind(except)
    .fetch_one(executor)
    .await?;
    Ok(taken)
}

fn bird_from_row(row: &PgRow) -> Result<Bird, sqlx::Error> {
    Ok(Bird {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        species: row.try_get("species")?,
        likes: row.try_get("likes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

/// A write that passed the pre-check but lost a race on `UNIQUE(name)`.
fn name_taken_failure<T>() -> ValidationResult<T> {
    let mut errors = ValidationErrors::new();
    errors.add("name", crate::domain::bird::TAKEN);
    ValidationResult::Failure(errors)
}

#[async_trait]
impl BirdStore for PgBirdStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bird>> {
        let sql = format!("SELECT {} FROM birds WHERE id = $1", BIRD_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(bird_from_row).transpose()?)
    }

    async fn list_all(&self) -> StoreResult<Vec<Bird>> {
        let sql = format!("SELECT {} FROM birds ORDER BY id", BIRD_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut birds = Vec::with_capacity(rows.len());
        for row in &rows {
            birds.push(bird_from_row(row)?);
        }
        Ok(birds)
    }

    async fn create(&self, params: &BirdParams) -> StoreResult<ValidationResult<Bird>> {
        let changeset = Changeset::for_create(params);
        let taken = name_taken(&self.pool, changeset.name_to_check(), None).await?;

        let attrs = match changeset.validate(taken) {
            ValidationResult::Success(attrs) => attrs,
            ValidationResult::Failure(errors) => return Ok(ValidationResult::Failure(errors)),
        };

        let sql = format!(
            "INSERT INTO birds (name, species, likes) VALUES ($1, $2, $3) RETURNING {}",
            BIRD_COLUMNS
        );
        let inserted = sqlx::query(&sql)
            .bind(&attrs.name)
            .bind(&attrs.species)
            .bind(attrs.likes)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(row) => Ok(ValidationResult::Success(bird_from_row(&row)?)),
            Err(e) if is_unique_violation(&e) => Ok(name_taken_failure()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        bird: &Bird,
        params: &BirdParams,
    ) -> StoreResult<ValidationResult<Bird>> {
        let mut tx = self.pool.begin().await?;

        // Lock and re-read the row so unsubmitted columns keep their current values.
        let sql = format!("SELECT {} FROM birds WHERE id = $1 FOR UPDATE", BIRD_COLUMNS);
        let Some(row) = sqlx::query(&sql)
            .bind(bird.id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Err(StoreError::NotFound(bird.id));
        };
        let current = bird_from_row(&row)?;

        let changeset = Changeset::for_update(&current, params);
        let taken = name_taken(&mut *tx, changeset.name_to_check(), Some(current.id)).await?;

        let attrs = match changeset.validate(taken) {
            ValidationResult::Success(attrs) => attrs,
            ValidationResult::Failure(errors) => return Ok(ValidationResult::Failure(errors)),
        };

        // SET expressions see the old row, so updated_at only moves on a real change.
        let sql = format!(
            "UPDATE birds SET
                name = $2,
                species = $3,
                likes = $4,
                updated_at = CASE
                    WHEN name IS DISTINCT FROM $2
                      OR species IS DISTINCT FROM $3
                      OR likes IS DISTINCT FROM $4
                    THEN now()
                    ELSE updated_at
                END
             WHERE id = $1
             RETURNING {}",
            BIRD_COLUMNS
        );
        let updated = sqlx::query(&sql)
            .bind(current.id)
            .bind(&attrs.name)
            .bind(&attrs.species)
            .bind(attrs.likes)
            .fetch_one(&mut *tx)
            .await;

        match updated {
            Ok(row) => {
                let bird = bird_from_row(&row)?;
                tx.commit().await?;
                Ok(ValidationResult::Success(bird))
            }
            Err(e) if is_unique_violation(&e) => Ok(name_taken_failure()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, bird: &Bird) -> StoreResult<()> {
        sqlx::query("DELETE FROM birds WHERE id = $1")
            .bind(bird.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
