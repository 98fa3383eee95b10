// ABOUTME: Tests for user storage layer
// ABOUTME: Verifies email lookup, lazy creation, and the unique constraint

use super::storage::UserStorage;
use super::types::NewUser;
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            avatar_url TEXT,
            provider TEXT NOT NULL,
            provider_id TEXT,
            max_usage INTEGER NOT NULL DEFAULT 1000,
            usage INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'utc'))
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

fn sample_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: Some("Test User".to_string()),
        avatar_url: Some("https://example.com/avatar.png".to_string()),
        provider: "google".to_string(),
        provider_id: Some("google-123".to_string()),
    }
}

#[tokio::test]
async fn test_insert_user_assigns_id_and_defaults() {
    let pool = setup_test_db().await;
    let storage = UserStorage::new(pool);

    let user = storage.insert_user(sample_user("a@example.com")).await.unwrap();

    assert!(!user.id.is_empty());
    assert_eq!(user.email, "a@example.com");
    assert_eq!(user.provider, "google");
    assert_eq!(user.usage, 0);
    assert_eq!(user.max_usage, 1000);
}

#[tokio::test]
async fn test_get_user_by_email_exact_match() {
    let pool = setup_test_db().await;
    let storage = UserStorage::new(pool);

    let created = storage.insert_user(sample_user("a@example.com")).await.unwrap();

    let found = storage.get_user_by_email("a@example.com").await.unwrap();
    assert_eq!(found.unwrap().id, created.id);

    // Case differs, no match
    let missing = storage.get_user_by_email("A@example.com").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_get_user_missing_returns_not_found() {
    let pool = setup_test_db().await;
    let storage = UserStorage::new(pool);

    let err = storage.get_user("no-such-id").await.unwrap_err();
    assert!(matches!(err, crate::error::StorageError::NotFound));
}

#[tokio::test]
async fn test_duplicate_email_surfaces_unique_violation() {
    let pool = setup_test_db().await;
    let storage = UserStorage::new(pool);

    storage.insert_user(sample_user("a@example.com")).await.unwrap();
    let err = storage.insert_user(sample_user("a@example.com")).await.unwrap_err();

    assert!(err.is_unique_violation());
}
