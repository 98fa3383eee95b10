// ABOUTME: SQLite storage layer for Repolens
// ABOUTME: Provides the connection pool, migrations, and user/API-key storage

pub mod api_keys;
pub mod db;
pub mod error;
pub mod users;

pub use api_keys::{ApiKey, ApiKeyMetadata, ApiKeyStorage, ApiKeyUpdateInput, KeyType};
pub use db::DbState;
pub use error::{StorageError, StorageResult};
pub use users::{NewUser, User, UserStorage};
