// ABOUTME: Signed session tokens carrying the internal user id
// ABOUTME: HS256 JWTs minted at sign-in and verified on every request

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use repolens_storage::User;

use crate::error::{AuthError, AuthResult};

/// Session lifetime
const SESSION_TTL_DAYS: i64 = 7;

/// Lifetime of the transient sign-in state token
const STATE_TTL_MINUTES: i64 = 10;

/// Claims carried by a session token. `sub` is the internal user id,
/// immutable for the token's lifetime; the rest mirrors the provider's
/// identity claims for UI display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.avatar_url.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }
}

/// Transient claims bridging the login redirect and the callback.
/// Holds the CSRF state and PKCE verifier, signed so the browser
/// cannot tamper with either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    pub state: String,
    pub verifier: String,
    pub iat: i64,
    pub exp: i64,
}

impl StateClaims {
    pub fn new(state: String, verifier: String) -> Self {
        let now = Utc::now();
        Self {
            state,
            verifier,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
        }
    }
}

/// Mint a signed session token for a resolved user.
pub fn mint_session(user: &User, secret: &str) -> AuthResult<String> {
    let claims = SessionClaims::for_user(user);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Verify a session token and return its claims. Expired or tampered
/// tokens are rejected.
pub fn verify_session(token: &str, secret: &str) -> AuthResult<SessionClaims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Mint the short-lived sign-in state token.
pub fn mint_state(claims: &StateClaims, secret: &str) -> AuthResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Verify the sign-in state token.
pub fn verify_state(token: &str, secret: &str) -> AuthResult<StateClaims> {
    decode::<StateClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "user-1".to_string(),
            email: "a@example.com".to_string(),
            name: Some("Test User".to_string()),
            avatar_url: Some("https://example.com/a.png".to_string()),
            provider: "google".to_string(),
            provider_id: Some("g-123".to_string()),
            max_usage: 1000,
            usage: 0,
            created_at: "2025-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_session_roundtrip_preserves_user_id() {
        let token = mint_session(&test_user(), "secret").unwrap();
        let claims = verify_session(&token, "secret").unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_session_rejects_wrong_secret() {
        let token = mint_session(&test_user(), "secret").unwrap();
        assert!(verify_session(&token, "other-secret").is_err());
    }

    #[test]
    fn test_session_rejects_tampered_token() {
        let token = mint_session(&test_user(), "secret").unwrap();
        let tampered = format!("{}x", token);
        assert!(verify_session(&tampered, "secret").is_err());
    }

    #[test]
    fn test_state_roundtrip() {
        let claims = StateClaims::new("state-abc".to_string(), "verifier-xyz".to_string());
        let token = mint_state(&claims, "secret").unwrap();
        let decoded = verify_state(&token, "secret").unwrap();

        assert_eq!(decoded.state, "state-abc");
        assert_eq!(decoded.verifier, "verifier-xyz");
    }
}
