// ABOUTME: Environment-driven configuration for the Repolens server
// ABOUTME: Centralizes env var names and validation at startup

use std::env;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

// Environment variable names
pub const PORT: &str = "PORT";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";
pub const DATABASE_PATH: &str = "DATABASE_PATH";
pub const SESSION_SECRET: &str = "SESSION_SECRET";
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const OAUTH_REDIRECT_URL: &str = "OAUTH_REDIRECT_URL";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub session_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub oauth_redirect_url: String,
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
}

// Manual Debug keeps secrets out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("cors_origin", &self.cors_origin)
            .field("database_path", &self.database_path)
            .field("session_secret", &"[redacted]")
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &"[redacted]")
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "[redacted]"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[redacted]"))
            .field("gemini_model", &self.gemini_model)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var(PORT).unwrap_or_else(|_| "4001".to_string());
        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var(CORS_ORIGIN).unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_path = env::var(DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("repolens.db"));

        let oauth_redirect_url = env::var(OAUTH_REDIRECT_URL)
            .unwrap_or_else(|_| format!("http://localhost:{}/api/auth/callback", port));

        Ok(Config {
            port,
            cors_origin,
            database_path,
            session_secret: required(SESSION_SECRET)?,
            google_client_id: required(GOOGLE_CLIENT_ID)?,
            google_client_secret: required(GOOGLE_CLIENT_SECRET)?,
            oauth_redirect_url,
            github_token: env::var(GITHUB_TOKEN).ok(),
            gemini_api_key: env::var(GEMINI_API_KEY).ok(),
            gemini_model: env::var(GEMINI_MODEL).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = Config {
            port: 4001,
            cors_origin: "http://localhost:3000".to_string(),
            database_path: PathBuf::from("repolens.db"),
            session_secret: "session-secret-value".to_string(),
            google_client_id: "client-123".to_string(),
            google_client_secret: "oauth-secret-value".to_string(),
            oauth_redirect_url: "http://localhost:4001/api/auth/callback".to_string(),
            github_token: Some("gh-token-value".to_string()),
            gemini_api_key: Some("gemini-key-value".to_string()),
            gemini_model: None,
        };

        let printed = format!("{:?}", config);
        assert!(printed.contains("client-123"));
        assert!(!printed.contains("session-secret-value"));
        assert!(!printed.contains("oauth-secret-value"));
        assert!(!printed.contains("gh-token-value"));
        assert!(!printed.contains("gemini-key-value"));
    }
}
