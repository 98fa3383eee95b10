// ABOUTME: OAuth module for third-party sign-in
// ABOUTME: Google authorization-code flow with PKCE

pub mod client;
pub mod pkce;
pub mod types;

pub use client::OAuthClient;
pub use pkce::{generate_pkce_challenge, verify_pkce_challenge};
pub use types::{ExternalIdentity, GoogleOAuthConfig, PkceChallenge, TokenResponse, UserInfo};
