// ABOUTME: Authentication context for API requests
// ABOUTME: Session extraction and cookie helpers for request handlers

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use repolens_auth::session::verify_session;

use crate::error::ApiError;
use crate::AppState;

/// Name of the session cookie set at sign-in
pub const SESSION_COOKIE: &str = "repolens_session";

/// Name of the transient cookie carrying OAuth state across the redirect
pub const OAUTH_STATE_COOKIE: &str = "repolens_oauth_state";

/// Current authenticated user, extracted from a verified session token.
/// A non-empty id here is guaranteed to have been minted by the identity
/// bridge at sign-in time.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_value(&parts.headers, SESSION_COOKIE))
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

        let claims = verify_session(&token, &state.session_secret)
            .map_err(|_| ApiError::Unauthorized("Unauthorized".to_string()))?;

        // An empty subject is treated the same as no session
        if claims.sub.is_empty() {
            return Err(ApiError::Unauthorized("Unauthorized".to_string()));
        }

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}

/// Extract a bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

/// Extract a named cookie value from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        if k == name {
            Some(v.to_string())
        } else {
            None
        }
    })
}

/// Build a Set-Cookie value for an HttpOnly session-scoped cookie
pub fn set_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, value, max_age_secs
    )
}

/// Build a Set-Cookie value that clears a cookie
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}
