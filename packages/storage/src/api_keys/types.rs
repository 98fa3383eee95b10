// ABOUTME: Type definitions for API keys
// ABOUTME: Key records, the dev/prod type enum, and masked display helpers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Fixed literal prefix carried by every generated secret
pub const KEY_PREFIX: &str = "tvly-";

/// API key type, restricted to a fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Dev,
    Prod,
}

impl FromStr for KeyType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(KeyType::Dev),
            "prod" => Ok(KeyType::Prod),
            other => Err(StorageError::InvalidKeyType(other.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Dev => write!(f, "dev"),
            KeyType::Prod => write!(f, "prod"),
        }
    }
}

/// API key row stored in the database. The `key` field holds the
/// plaintext secret; it is returned in full only at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub key_type: KeyType,
    pub key: String,
    pub usage: i64,
    pub created_at: String,
}

impl ApiKey {
    /// Masked form of the secret: prefix plus the last four characters.
    pub fn masked_key(&self) -> String {
        let tail: String = self
            .key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}****{}", KEY_PREFIX, tail)
    }
}

/// Non-secret metadata returned by bearer verification
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyMetadata {
    pub name: String,
    pub key_type: KeyType,
}

/// Mutable attributes for an existing key. Secret and owner never change.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyUpdateInput {
    pub name: Option<String>,
    pub key_type: Option<KeyType>,
}
