// ABOUTME: HTTP handlers for the OAuth sign-in flow
// ABOUTME: Login redirect, provider callback, and sign-out

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use repolens_auth::oauth::pkce::{generate_pkce_challenge, generate_state};
use repolens_auth::session::{mint_session, mint_state, verify_state, StateClaims};
use repolens_auth::{resolve_or_create_user, AuthError, ExternalIdentity};

use crate::auth::{clear_cookie, cookie_value, set_cookie, OAUTH_STATE_COOKIE, SESSION_COOKIE};
use crate::error::ApiError;
use crate::AppState;

const SESSION_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;
const STATE_COOKIE_MAX_AGE: i64 = 10 * 60;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
}

/// Start the sign-in flow: generate PKCE and CSRF state, stash both in a
/// short-lived signed cookie, and redirect to the provider.
pub async fn login(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pkce = generate_pkce_challenge().map_err(ApiError::from)?;
    let csrf_state = generate_state();

    let authorize_url = state
        .oauth
        .authorize_url(&csrf_state, &pkce)
        .map_err(ApiError::from)?;

    let claims = StateClaims::new(csrf_state, pkce.code_verifier);
    let state_token = mint_state(&claims, &state.session_secret).map_err(ApiError::from)?;

    let headers = AppendHeaders([(
        header::SET_COOKIE,
        set_cookie(OAUTH_STATE_COOKIE, &state_token, STATE_COOKIE_MAX_AGE),
    )]);

    Ok((headers, Redirect::temporary(authorize_url.as_str())))
}

/// Provider callback: verify state, exchange the code, resolve the
/// identity to an internal user, and mint the session. Any failure here
/// rejects the sign-in; no partial session is ever issued.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let state_token = cookie_value(&headers, OAUTH_STATE_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Missing sign-in state".to_string()))?;

    let state_claims =
        verify_state(&state_token, &state.session_secret).map_err(ApiError::from)?;

    if state_claims.state != query.state {
        return Err(AuthError::StateMismatch.into());
    }

    let tokens = state
        .oauth
        .exchange_code(&query.code, &state_claims.verifier)
        .await
        .map_err(ApiError::from)?;

    let userinfo = state
        .oauth
        .fetch_userinfo(&tokens.access_token)
        .await
        .map_err(ApiError::from)?;

    let identity = ExternalIdentity::try_from(userinfo).map_err(ApiError::from)?;

    let user = resolve_or_create_user(&state.db.user_storage, identity)
        .await
        .map_err(ApiError::from)?;

    info!("Sign-in completed for user {}", user.id);

    let session_token = mint_session(&user, &state.session_secret).map_err(ApiError::from)?;

    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie(SESSION_COOKIE, &session_token, SESSION_COOKIE_MAX_AGE),
        ),
        (header::SET_COOKIE, clear_cookie(OAUTH_STATE_COOKIE)),
    ]);

    Ok((
        cookies,
        Json(SignInResponse {
            token: session_token,
        }),
    ))
}

/// Sign out: destroy the session cookie.
pub async fn logout() -> impl IntoResponse {
    let cookies = AppendHeaders([(header::SET_COOKIE, clear_cookie(SESSION_COOKIE))]);
    (cookies, Json(serde_json::json!({ "message": "Signed out" })))
}
