// ABOUTME: HTTP handler for the API-key-gated summarization endpoint
// ABOUTME: Verifies the bearer key, then runs the fetch-and-generate pipeline

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use repolens_summarizer::RepoSummary;

use crate::error::ApiError;
use crate::AppState;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

/// POST /api/github-summarizer. Key verification is the sole gate: no
/// usage caps, no rate limits, and a dev key is as good as a prod key.
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<RepoSummary>, ApiError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("API key is required".to_string()))?;

    // A lookup error is deliberately indistinguishable from a miss
    let key_meta = match state.db.api_key_storage.verify_key(presented).await {
        Ok(Some(meta)) => meta,
        Ok(None) => {
            return Err(ApiError::Unauthorized("Invalid API key".to_string()));
        }
        Err(e) => {
            warn!("API key lookup failed: {}", e);
            return Err(ApiError::Unauthorized("Invalid API key".to_string()));
        }
    };

    let Json(request) = body.map_err(|_| {
        ApiError::InvalidArgument("Request body must be a valid JSON object".to_string())
    })?;

    info!(
        "Summarize request authorized by key '{}' ({})",
        key_meta.name, key_meta.key_type
    );

    let summary = state
        .summarizer
        .summarize(&request.url)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(summary))
}
