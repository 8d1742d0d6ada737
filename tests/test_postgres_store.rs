//! PostgreSQL store integration test.
//!
//! Needs a reachable database in `DATABASE_URL` (or `.env`); skipped otherwise.
//! The test truncates the `birds` table.

use bird_api::{BirdParams, BirdStore, PgBirdStore, StoreError, ValidationResult};
use serde_json::json;

fn params(v: serde_json::Value) -> BirdParams {
    BirdParams::permit(v).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_store_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        println!("--- test_postgres_store_lifecycle: DATABASE_URL not set, skipping ---");
        return Ok(());
    };

    let store = PgBirdStore::connect(&database_url, 2).await?;
    sqlx::query("TRUNCATE TABLE birds RESTART IDENTITY")
        .execute(store.pool())
        .await?;
    store.ping().await?;

    // Create
    let ruby = match store
        .create(&params(json!({ "name": "Ruby", "species": "Archilochus colubris" })))
        .await?
    {
        ValidationResult::Success(b) => b,
        ValidationResult::Failure(e) => panic!("create failed: {:?}", e),
    };
    assert_eq!(ruby.likes, 0);
    assert_eq!(store.find_by_id(ruby.id).await?, Some(ruby.clone()));

    // Missing and duplicate names commit nothing
    let missing = store.create(&params(json!({ "species": "Calypte anna" }))).await?;
    match missing {
        ValidationResult::Failure(e) => assert_eq!(e.get("name"), Some(&["can't be blank".to_string()][..])),
        ValidationResult::Success(b) => panic!("blank name committed: {:?}", b),
    }
    let duplicate = store.create(&params(json!({ "name": "Ruby" }))).await?;
    match duplicate {
        ValidationResult::Failure(e) => {
            assert_eq!(e.get("name"), Some(&["has already been taken".to_string()][..]))
        }
        ValidationResult::Success(b) => panic!("duplicate committed: {:?}", b),
    }
    assert_eq!(store.list_all().await?.len(), 1);

    // Update twice with the same values
    let change = params(json!({ "likes": 5 }));
    let first = store.update(&ruby, &change).await?.into_result().map_err(|e| format!("{:?}", e))?;
    let second = store.update(&first, &change).await?.into_result().map_err(|e| format!("{:?}", e))?;
    assert_eq!(first.likes, 5);
    assert_eq!(first, second);

    // An update built from the pre-update snapshot keeps the committed likes
    let from_stale = store
        .update(&ruby, &params(json!({ "species": "Calypte anna" })))
        .await?
        .into_result()
        .map_err(|e| format!("{:?}", e))?;
    assert_eq!(from_stale.likes, 5);
    assert_eq!(from_stale.species.as_deref(), Some("Calypte anna"));

    // Delete
    store.delete(&from_stale).await?;
    assert_eq!(store.find_by_id(from_stale.id).await?, None);

    // Updating a deleted row is NotFound
    let gone = store.update(&from_stale, &params(json!({ "likes": 1 }))).await;
    assert!(matches!(gone, Err(StoreError::NotFound(_))));
    assert!(store.list_all().await?.is_empty());

    Ok(())
}
