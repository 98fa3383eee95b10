// ABOUTME: Shared API error type and HTTP response mapping
// ABOUTME: Converts domain errors into one user-visible status plus a short JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use thiserror::Error;
use tracing::error;

use repolens_auth::AuthError;
use repolens_storage::StorageError;
use repolens_summarizer::SummarizerError;

/// API error taxonomy. Every handler boundary converts into exactly one
/// of these; the caller sees a status code and a short `error` string,
/// never internal detail.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    SchemaValidation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Upstream and schema failures surface as generic 500s;
            // detail stays in the logs.
            ApiError::UpstreamUnavailable(_)
            | ApiError::SchemaValidation(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, ResponseJson(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound("Record not found".to_string()),
            StorageError::InvalidKeyType(t) => {
                ApiError::InvalidArgument(format!("Invalid API key type: {}", t))
            }
            other => {
                error!("Storage error: {}", other);
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::StateMismatch => {
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            AuthError::MissingEmail => {
                ApiError::Unauthorized("Identity provider returned no email".to_string())
            }
            AuthError::Storage(storage) => storage.into(),
            other => {
                error!("Auth error: {}", other);
                ApiError::UpstreamUnavailable("Sign-in failed".to_string())
            }
        }
    }
}

impl From<SummarizerError> for ApiError {
    fn from(err: SummarizerError) -> Self {
        match err {
            SummarizerError::InvalidRepoUrl(msg) => ApiError::InvalidArgument(msg),
            SummarizerError::SchemaValidation(msg) | SummarizerError::ParseError(msg) => {
                error!("Summarizer output validation failed: {}", msg);
                ApiError::SchemaValidation("Failed to process repository README".to_string())
            }
            other => {
                error!("Summarizer upstream error: {}", other);
                ApiError::UpstreamUnavailable("Failed to process repository README".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidArgument("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::UpstreamUnavailable("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::SchemaValidation("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let api: ApiError = StorageError::NotFound.into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }

    #[test]
    fn test_invalid_key_type_maps_to_400() {
        let api: ApiError = StorageError::InvalidKeyType("staging".to_string()).into();
        assert!(matches!(api, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_repo_url_maps_to_400() {
        let api: ApiError = SummarizerError::InvalidRepoUrl("bad".to_string()).into();
        assert!(matches!(api, ApiError::InvalidArgument(_)));
    }
}
