// ABOUTME: Tests for API key storage
// ABOUTME: Covers generation, ownership scoping, and exact-match verification

use super::storage::ApiKeyStorage;
use super::types::{ApiKeyUpdateInput, KeyType, KEY_PREFIX};
use crate::error::StorageError;
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE api_keys (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            key TEXT NOT NULL UNIQUE,
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

#[tokio::test]
async fn test_generate_secret_prefixed_and_unique() {
    let s1 = ApiKeyStorage::generate_secret();
    let s2 = ApiKeyStorage::generate_secret();

    assert!(s1.starts_with(KEY_PREFIX));
    assert!(s2.starts_with(KEY_PREFIX));
    assert_eq!(s1.len(), KEY_PREFIX.len() + 32);
    assert_ne!(s1, s2);
}

#[tokio::test]
async fn test_create_key_returns_full_secret() {
    let pool = setup_test_db().await;
    let storage = ApiKeyStorage::new(pool);

    let key = storage.create_key("user-1", "ci key", KeyType::Dev).await.unwrap();

    assert_eq!(key.user_id, "user-1");
    assert_eq!(key.name, "ci key");
    assert_eq!(key.key_type, KeyType::Dev);
    assert!(key.key.starts_with(KEY_PREFIX));
    assert_eq!(key.usage, 0);
}

#[tokio::test]
async fn test_list_keys_scoped_to_owner_newest_first() {
    let pool = setup_test_db().await;
    let storage = ApiKeyStorage::new(pool);

    let first = storage.create_key("user-1", "first", KeyType::Dev).await.unwrap();
    let second = storage.create_key("user-1", "second", KeyType::Prod).await.unwrap();
    storage.create_key("user-2", "other", KeyType::Dev).await.unwrap();

    let keys = storage.list_keys("user-1").await.unwrap();

    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| k.user_id == "user-1"));
    assert_eq!(keys[0].id, second.id);
    assert_eq!(keys[1].id, first.id);
}

#[tokio::test]
async fn test_update_key_enforces_ownership() {
    let pool = setup_test_db().await;
    let storage = ApiKeyStorage::new(pool);

    let key = storage.create_key("user-1", "old", KeyType::Dev).await.unwrap();

    let update = ApiKeyUpdateInput {
        name: Some("new".to_string()),
        key_type: Some(KeyType::Prod),
    };
    storage.update_key("user-1", &key.id, update).await.unwrap();

    let keys = storage.list_keys("user-1").await.unwrap();
    assert_eq!(keys[0].name, "new");
    assert_eq!(keys[0].key_type, KeyType::Prod);
    // Secret is immutable
    assert_eq!(keys[0].key, key.key);

    // Wrong owner updates nothing
    let err = storage
        .update_key("user-2", &key.id, ApiKeyUpdateInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_delete_key_removes_from_listing() {
    let pool = setup_test_db().await;
    let storage = ApiKeyStorage::new(pool);

    let key = storage.create_key("user-1", "to-delete", KeyType::Dev).await.unwrap();
    storage.delete_key("user-1", &key.id).await.unwrap();

    let keys = storage.list_keys("user-1").await.unwrap();
    assert!(keys.is_empty());

    // Second delete reports NotFound, not a crash
    let err = storage.delete_key("user-1", &key.id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_verify_key_exact_match_only() {
    let pool = setup_test_db().await;
    let storage = ApiKeyStorage::new(pool);

    let key = storage.create_key("user-1", "prod key", KeyType::Prod).await.unwrap();

    let meta = storage.verify_key(&key.key).await.unwrap().unwrap();
    assert_eq!(meta.name, "prod key");
    assert_eq!(meta.key_type, KeyType::Prod);

    // Substring and case-only differences never match
    assert!(storage.verify_key(&key.key[..key.key.len() - 1]).await.unwrap().is_none());
    assert!(storage.verify_key(&key.key.to_uppercase()).await.unwrap().is_none());
    assert!(storage.verify_key("tvly-nonexistent").await.unwrap().is_none());
}
