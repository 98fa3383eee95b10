// ABOUTME: Identity bridge between external OAuth identities and user rows
// ABOUTME: Resolves an email to an internal user id, creating the row on first sign-in

use tracing::{debug, info};

use repolens_storage::{NewUser, User, UserStorage};

use crate::error::AuthResult;
use crate::oauth::types::ExternalIdentity;

/// Resolve an external identity to an internal user, creating the row
/// lazily on first sign-in. Invoked once per sign-in attempt; any storage
/// error here rejects the sign-in outright.
///
/// Two near-simultaneous first sign-ins for the same email can both miss
/// the lookup and race on insert. The UNIQUE(email) constraint is the sole
/// arbiter: the loser re-reads once and returns the winner's row.
pub async fn resolve_or_create_user(
    users: &UserStorage,
    identity: ExternalIdentity,
) -> AuthResult<User> {
    if let Some(existing) = users.get_user_by_email(&identity.email).await? {
        debug!("Sign-in resolved to existing user {}", existing.id);
        return Ok(existing);
    }

    let input = NewUser {
        email: identity.email.clone(),
        name: identity.name,
        avatar_url: identity.avatar_url,
        provider: identity.provider,
        provider_id: Some(identity.provider_id),
    };

    match users.insert_user(input).await {
        Ok(user) => {
            info!("Created user {} on first sign-in", user.id);
            Ok(user)
        }
        Err(err) if err.is_unique_violation() => {
            // Concurrent first sign-in created the row between our lookup
            // and insert; re-read once.
            debug!("Concurrent sign-in won the insert race, re-reading");
            let user = users
                .get_user_by_email(&identity.email)
                .await?
                .ok_or(err)?;
            Ok(user)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn setup_pool() -> SqlitePool {
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

    async fn setup_users() -> UserStorage {
        UserStorage::new(setup_pool().await)
    }

    fn identity(email: &str) -> ExternalIdentity {
        ExternalIdentity {
            email: email.to_string(),
            name: Some("Test User".to_string()),
            avatar_url: Some("https://example.com/a.png".to_string()),
            provider: "google".to_string(),
            provider_id: "g-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_sign_in_creates_exactly_one_row() {
        let users = setup_users().await;

        let user = resolve_or_create_user(&users, identity("a@example.com"))
            .await
            .unwrap();

        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.provider, "google");

        let stored = users.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, user.id);
    }

    #[tokio::test]
    async fn test_repeat_sign_in_reuses_existing_row() {
        let users = setup_users().await;

        let first = resolve_or_create_user(&users, identity("a@example.com"))
            .await
            .unwrap();
        let second = resolve_or_create_user(&users, identity("a@example.com"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_lost_insert_race_returns_winner_row() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();

        // ON CONFLICT FAIL keeps changes a statement already made when
        // its own insert hits the constraint; with the default ABORT the
        // trigger's row below would be rolled back along with it.
        sqlx::query(
            r#"
            CREATE TABLE users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE ON CONFLICT FAIL,
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

        // A trigger plays the concurrent sign-in that wins the insert
        // race between our lookup and our insert: it lands its own row
        // first, so our insert hits UNIQUE(email).
        sqlx::query(
            r#"
            CREATE TRIGGER sign_in_race BEFORE INSERT ON users
            BEGIN
                INSERT INTO users (id, email, provider)
                VALUES ('winner-id', NEW.email, 'google');
            END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let users = UserStorage::new(pool);

        let user = resolve_or_create_user(&users, identity("race@example.com"))
            .await
            .unwrap();

        assert_eq!(user.id, "winner-id");
        assert_eq!(user.email, "race@example.com");

        // Exactly one row exists for the contested email
        let survivor = users
            .get_user_by_email("race@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(survivor.id, "winner-id");
    }

    #[tokio::test]
    async fn test_distinct_emails_get_distinct_rows() {
        let users = setup_users().await;

        let a = resolve_or_create_user(&users, identity("a@example.com"))
            .await
            .unwrap();
        let b = resolve_or_create_user(&users, identity("b@example.com"))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
    }
}
