// ABOUTME: API key management module
// ABOUTME: Key generation, owner-scoped CRUD, and bearer verification

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::ApiKeyStorage;
pub use types::{ApiKey, ApiKeyMetadata, ApiKeyUpdateInput, KeyType};
