// ABOUTME: Main entry point for the Repolens API server
// ABOUTME: Wires configuration, storage, OAuth, and the summarizer into the router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use repolens_api::AppState;
use repolens_auth::{GoogleOAuthConfig, OAuthClient};
use repolens_storage::DbState;
use repolens_summarizer::{AiService, GithubClient, Summarizer};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Starting Repolens server on port {}", config.port);

    // All clients are constructed once here and injected; components do
    // not reach for process-wide globals.
    let db = DbState::init_with_path(config.database_path.clone()).await?;

    let oauth = OAuthClient::new(GoogleOAuthConfig {
        client_id: config.google_client_id.clone(),
        client_secret: config.google_client_secret.clone(),
        redirect_uri: config.oauth_redirect_url.clone(),
    })?;

    let summarizer = Summarizer::new(
        GithubClient::new(config.github_token.clone())?,
        AiService::new(config.gemini_api_key.clone(), config.gemini_model.clone())?,
    );

    let state = AppState {
        db,
        oauth,
        summarizer: Arc::new(summarizer),
        session_secret: config.session_secret.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = repolens_api::create_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
