// ABOUTME: Error types for authentication operations
// ABOUTME: Covers OAuth flows, session tokens, and storage failures

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth authentication failed: {0}")]
    OAuthFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("State mismatch: CSRF protection failed")]
    StateMismatch,

    #[error("PKCE error: {0}")]
    Pkce(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Identity assertion missing email")]
    MissingEmail,

    #[error("Storage error: {0}")]
    Storage(#[from] repolens_storage::StorageError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}
