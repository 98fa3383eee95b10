// ABOUTME: HTTP API layer for Repolens providing REST endpoints and routing
// ABOUTME: Integration layer that depends on the storage, auth, and summarizer packages

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use repolens_auth::OAuthClient;
use repolens_storage::DbState;
use repolens_summarizer::Summarizer;

pub mod auth;
pub mod auth_handlers;
pub mod error;
pub mod keys_handlers;
pub mod summarizer_handlers;
pub mod users_handlers;

pub use error::ApiError;

/// Shared application state for all handlers. Clients are constructed
/// once at the process entry point and injected here; nothing in this
/// layer reaches for module-level globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub oauth: OAuthClient,
    pub summarizer: Arc<Summarizer>,
    pub session_secret: String,
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Creates the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", get(auth_handlers::login))
        .route("/api/auth/callback", get(auth_handlers::callback))
        .route("/api/auth/logout", get(auth_handlers::logout))
        .route("/api/me", get(users_handlers::get_me))
        .route(
            "/api/keys",
            get(keys_handlers::list_keys).post(keys_handlers::create_key),
        )
        .route(
            "/api/keys/{id}",
            put(keys_handlers::update_key).delete(keys_handlers::delete_key),
        )
        .route(
            "/api/github-summarizer",
            post(summarizer_handlers::summarize),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
