// ABOUTME: Core type definitions for OAuth authentication
// ABOUTME: Provider configuration, token responses, and identity assertions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider name recorded on user rows created through this flow
pub const PROVIDER_NAME: &str = "google";

/// Google OAuth endpoints
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at sign-in
pub const GOOGLE_SCOPES: &[&str] = &["openid", "email", "profile"];

/// Google OAuth client configuration, supplied by the process entry point
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

// Manual Debug keeps the client secret out of logs
impl fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// PKCE challenge for the OAuth flow
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub code_challenge_method: String, // "S256"
}

/// OAuth token response from the provider
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

/// Userinfo document returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// External identity assertion handed to the identity bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: String,
}

impl TryFrom<UserInfo> for ExternalIdentity {
    type Error = crate::error::AuthError;

    fn try_from(info: UserInfo) -> Result<Self, Self::Error> {
        let email = info.email.ok_or(crate::error::AuthError::MissingEmail)?;

        Ok(Self {
            email,
            name: info.name,
            avatar_url: info.picture,
            provider: PROVIDER_NAME.to_string(),
            provider_id: info.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_config_debug_redacts_secret() {
        let config = GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "super-secret".to_string(),
            redirect_uri: "http://localhost:4001/api/auth/callback".to_string(),
        };

        let printed = format!("{:?}", config);
        assert!(printed.contains("client-123"));
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_identity_from_userinfo_requires_email() {
        let info = UserInfo {
            sub: "g-123".to_string(),
            email: None,
            name: Some("Nameless".to_string()),
            picture: None,
        };
        assert!(ExternalIdentity::try_from(info).is_err());

        let info = UserInfo {
            sub: "g-123".to_string(),
            email: Some("a@example.com".to_string()),
            name: Some("Named".to_string()),
            picture: Some("https://example.com/p.png".to_string()),
        };
        let identity = ExternalIdentity::try_from(info).unwrap();
        assert_eq!(identity.email, "a@example.com");
        assert_eq!(identity.provider, "google");
        assert_eq!(identity.provider_id, "g-123");
    }
}
