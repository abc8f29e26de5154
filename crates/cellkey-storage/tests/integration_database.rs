//! Integration tests for the access code store.
//!
//! These run against an in-memory SQLite database with the real embedded
//! migrations, validating repository behavior and the UNIQUE backstop.
//!
//! Run with: cargo test --package cellkey-storage --test integration_database

use cellkey_storage::{AccessCodeRepository, Database, SqliteAccessCodeRepository};

async fn repo() -> (Database, SqliteAccessCodeRepository) {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteAccessCodeRepository::new(db.pool().clone());
    (db, repo)
}

#[tokio::test]
async fn test_in_memory_database() {
    let db = Database::in_memory().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn test_migration_idempotency() {
    let db = Database::in_memory().await.unwrap();

    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    let result: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='access_codes'",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();

    assert_eq!(result.0, 1);

    db.close().await;
}

#[tokio::test]
async fn test_create_and_find_by_code() {
    let (db, repo) = repo().await;

    let id = repo.create("89E154gs12828", "111122223333").await.unwrap();
    assert!(id > 0);

    let record = repo.find_by_code("111122223333").await.unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.cell, "89E154gs12828");
    assert_eq!(record.code, "111122223333");

    assert!(repo.find_by_code("000000000000").await.unwrap().is_none());

    db.close().await;
}

#[tokio::test]
async fn test_exists_by_code() {
    let (db, repo) = repo().await;

    assert!(!repo.exists_by_code("111122223333").await.unwrap());
    repo.create("34r0361R8t765", "111122223333").await.unwrap();
    assert!(repo.exists_by_code("111122223333").await.unwrap());

    db.close().await;
}

#[tokio::test]
async fn test_delete_by_code() {
    let (db, repo) = repo().await;

    repo.create("416d61g56D509", "999988887777").await.unwrap();
    assert!(repo.delete_by_code("999988887777").await.unwrap());

    // Second delete quietly reports that nothing was removed.
    assert!(!repo.delete_by_code("999988887777").await.unwrap());
    assert!(repo.find_by_code("999988887777").await.unwrap().is_none());

    db.close().await;
}

#[tokio::test]
async fn test_duplicate_code_is_rejected_by_constraint() {
    let (db, repo) = repo().await;

    repo.create("89E154gs12828", "555566667777").await.unwrap();
    let err = repo
        .create("34r0361R8t765", "555566667777")
        .await
        .unwrap_err();

    assert!(err.is_unique_violation(), "unexpected error: {err}");
    assert_eq!(repo.count().await.unwrap(), 1);

    db.close().await;
}

#[tokio::test]
async fn test_count_tracks_lifecycle() {
    let (db, repo) = repo().await;

    assert_eq!(repo.count().await.unwrap(), 0);
    repo.create("89E154gs12828", "000011112222").await.unwrap();
    repo.create("34r0361R8t765", "000011113333").await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 2);

    repo.delete_by_code("000011112222").await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);

    db.close().await;
}

#[tokio::test]
async fn test_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cellkey-test.db");

    let config = cellkey_storage::DatabaseConfig::new(path.to_string_lossy().to_string());
    let db = Database::new(config).await.unwrap();
    let repo = SqliteAccessCodeRepository::new(db.pool().clone());

    repo.create("89E154gs12828", "123123123123").await.unwrap();
    assert!(repo.exists_by_code("123123123123").await.unwrap());

    db.close().await;
}
