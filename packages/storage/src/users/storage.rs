// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles lookup by id/email and insert on first sign-in

use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::types::{NewUser, User};
use crate::error::StorageError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => self.row_to_user(&row),
            None => Err(StorageError::NotFound),
        }
    }

    /// Look up a user by email, exact match, case as stored.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        debug!("Fetching user by email");

        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => Ok(Some(self.row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new user row and return it. A UNIQUE(email) violation
    /// bubbles up as-is so the caller can detect the concurrent-insert case.
    pub async fn insert_user(&self, input: NewUser) -> Result<User, StorageError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, avatar_url, provider, provider_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.avatar_url)
        .bind(&input.provider)
        .bind(&input.provider_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_user(&id).await
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            avatar_url: row.try_get("avatar_url")?,
            provider: row.try_get("provider")?,
            provider_id: row.try_get("provider_id")?,
            max_usage: row.try_get("max_usage")?,
            usage: row.try_get("usage")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
