// ABOUTME: Storage operations for API keys
// ABOUTME: Secret generation, owner-scoped CRUD, and exact-match verification

use nanoid::nanoid;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::types::{ApiKey, ApiKeyMetadata, ApiKeyUpdateInput, KeyType, KEY_PREFIX};
use crate::error::StorageError;

pub struct ApiKeyStorage {
    pool: SqlitePool,
}

impl ApiKeyStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a fresh opaque secret: fixed prefix plus 32 random
    /// URL-safe characters. Unguessability is the only property required.
    pub fn generate_secret() -> String {
        format!("{}{}", KEY_PREFIX, nanoid!(32))
    }

    /// Create a new API key owned by `user_id`. This is the only place
    /// the full plaintext secret leaves the storage layer.
    pub async fn create_key(
        &self,
        user_id: &str,
        name: &str,
        key_type: KeyType,
    ) -> Result<ApiKey, StorageError> {
        let id = Uuid::new_v4().to_string();
        let secret = Self::generate_secret();

        debug!("Creating API key '{}' for user {}", name, user_id);

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, name, type, key)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(key_type.to_string())
        .bind(&secret)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM api_keys WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.row_to_key(&row)
    }

    /// List all keys owned by `user_id`, newest first.
    pub async fn list_keys(&self, user_id: &str) -> Result<Vec<ApiKey>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM api_keys WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_key(row)).collect()
    }

    /// Update name and/or type of a key. The WHERE clause is owner-scoped;
    /// a non-owner or unknown id updates zero rows and reports NotFound.
    pub async fn update_key(
        &self,
        user_id: &str,
        key_id: &str,
        input: ApiKeyUpdateInput,
    ) -> Result<(), StorageError> {
        debug!("Updating API key {} for user {}", key_id, user_id);

        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET name = COALESCE(?, name),
                type = COALESCE(?, type)
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(input.name)
        .bind(input.key_type.map(|t| t.to_string()))
        .bind(key_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete a key. Owner-scoped like update; an absent id is NotFound,
    /// which callers surface as a 404 rather than a crash.
    pub async fn delete_key(&self, user_id: &str, key_id: &str) -> Result<(), StorageError> {
        debug!("Deleting API key {} for user {}", key_id, user_id);

        let result = sqlx::query("DELETE FROM api_keys WHERE id = ? AND user_id = ?")
            .bind(key_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Verify a presented bearer secret with an exact-match lookup.
    /// Returns non-secret metadata on match, None otherwise. The secret
    /// is never echoed back.
    pub async fn verify_key(&self, presented: &str) -> Result<Option<ApiKeyMetadata>, StorageError> {
        let row = sqlx::query("SELECT name, type FROM api_keys WHERE key = ?")
            .bind(presented)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let name: String = row.try_get("name")?;
                let type_str: String = row.try_get("type")?;
                Ok(Some(ApiKeyMetadata {
                    name,
                    key_type: type_str.parse()?,
                }))
            }
            None => Ok(None),
        }
    }

    fn row_to_key(&self, row: &sqlx::sqlite::SqliteRow) -> Result<ApiKey, StorageError> {
        let type_str: String = row.try_get("type")?;

        Ok(ApiKey {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            key_type: type_str.parse()?,
            key: row.try_get("key")?,
            usage: row.try_get("usage")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
