// ABOUTME: OAuth client for the Google authorization-code flow
// ABOUTME: Builds authorization URLs, exchanges codes, and fetches userinfo

use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::oauth::types::{
    GoogleOAuthConfig, PkceChallenge, TokenResponse, UserInfo, GOOGLE_AUTH_URL, GOOGLE_SCOPES,
    GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL,
};

/// OAuth client holding the HTTP client and provider configuration.
/// Constructed once at startup and shared through the router state.
#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    config: GoogleOAuthConfig,
}

impl OAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(AuthError::Http)?;

        Ok(Self { client, config })
    }

    /// Build the authorization URL the browser is redirected to.
    pub fn authorize_url(&self, state: &str, pkce: &PkceChallenge) -> AuthResult<Url> {
        let mut url = Url::parse(GOOGLE_AUTH_URL)
            .map_err(|e| AuthError::OAuthFailed(format!("Invalid auth URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &GOOGLE_SCOPES.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.code_challenge)
            .append_pair("code_challenge_method", &pkce.code_challenge_method)
            .append_pair("access_type", "online");

        Ok(url)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str) -> AuthResult<TokenResponse> {
        debug!("Exchanging authorization code for tokens");

        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(AuthError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Token exchange failed: {} - {}", status, body);
            return Err(AuthError::TokenExchange(format!(
                "Provider returned {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(AuthError::Http)?;
        Ok(token)
    }

    /// Fetch the userinfo document for an access token.
    pub async fn fetch_userinfo(&self, access_token: &str) -> AuthResult<UserInfo> {
        debug!("Fetching userinfo from provider");

        let response = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(AuthError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Userinfo request failed: {}", status);
            return Err(AuthError::Provider(format!(
                "Userinfo request returned {}",
                status
            )));
        }

        let info: UserInfo = response.json().await.map_err(AuthError::Http)?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::pkce::generate_pkce_challenge;

    fn test_client() -> OAuthClient {
        OAuthClient::new(GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:4001/api/auth/callback".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url_carries_pkce_and_state() {
        let client = test_client();
        let pkce = generate_pkce_challenge().unwrap();

        let url = client.authorize_url("state-abc", &pkce).unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(pairs.contains(&("state".to_string(), "state-abc".to_string())));
        assert!(pairs.contains(&("code_challenge_method".to_string(), "S256".to_string())));
        assert!(pairs.iter().any(|(k, v)| k == "scope" && v.contains("email")));
    }
}
