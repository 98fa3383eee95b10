// ABOUTME: Authentication for Repolens
// ABOUTME: Google OAuth flow, identity bridge, and signed session tokens

pub mod error;
pub mod identity;
pub mod oauth;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use identity::resolve_or_create_user;
pub use oauth::client::OAuthClient;
pub use oauth::types::{ExternalIdentity, GoogleOAuthConfig};
pub use session::{SessionClaims, StateClaims};
