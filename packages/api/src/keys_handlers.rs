// ABOUTME: HTTP request handlers for API key management
// ABOUTME: Owner-scoped create, list, update, and delete

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use repolens_storage::{ApiKey, ApiKeyUpdateInput, KeyType};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

/// Key record as listed in the dashboard. The secret is masked; the
/// full value is only ever present in the create response.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub key: String,
    pub usage: i64,
    pub created_at: String,
}

impl ApiKeyResponse {
    fn masked(key: &ApiKey) -> Self {
        Self {
            id: key.id.clone(),
            name: key.name.clone(),
            key_type: key.key_type,
            key: key.masked_key(),
            usage: key.usage,
            created_at: key.created_at.clone(),
        }
    }

    fn with_secret(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            key_type: key.key_type,
            key: key.key,
            usage: key.usage,
            created_at: key.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKeyRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub key_type: Option<String>,
}

/// List the caller's keys, newest first
pub async fn list_keys(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<ApiKeyResponse>>, ApiError> {
    let keys = state
        .db
        .api_key_storage
        .list_keys(&current_user.id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(keys.iter().map(ApiKeyResponse::masked).collect()))
}

/// Create a key. The response carries the full plaintext secret; this is
/// the only place it is ever returned.
pub async fn create_key(
    State(state): State<AppState>,
    current_user: CurrentUser,
    body: Result<Json<CreateKeyRequest>, JsonRejection>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let Json(request) = body.map_err(|_| {
        ApiError::InvalidArgument("Request body must be a valid JSON object".to_string())
    })?;

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "Key name must not be empty".to_string(),
        ));
    }

    // Type restricted to the fixed set, rejected before persistence
    let key_type: KeyType = request.key_type.parse().map_err(ApiError::from)?;

    info!("Creating API key for user {}", current_user.id);

    let key = state
        .db
        .api_key_storage
        .create_key(&current_user.id, request.name.trim(), key_type)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyResponse::with_secret(key)))
}

/// Update a key's name and/or type. Secret and owner are immutable.
pub async fn update_key(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(key_id): Path<String>,
    body: Result<Json<UpdateKeyRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) = body.map_err(|_| {
        ApiError::InvalidArgument("Request body must be a valid JSON object".to_string())
    })?;

    let key_type = match request.key_type {
        Some(t) => Some(t.parse::<KeyType>().map_err(ApiError::from)?),
        None => None,
    };

    let input = ApiKeyUpdateInput {
        name: request.name,
        key_type,
    };

    state
        .db
        .api_key_storage
        .update_key(&current_user.id, &key_id, input)
        .await
        .map_err(|e| match e {
            repolens_storage::StorageError::NotFound => {
                ApiError::NotFound("API key not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({ "message": "API key updated" })))
}

/// Delete a key owned by the caller
pub async fn delete_key(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(key_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .api_key_storage
        .delete_key(&current_user.id, &key_id)
        .await
        .map_err(|e| match e {
            repolens_storage::StorageError::NotFound => {
                ApiError::NotFound("API key not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({ "message": "API key deleted" })))
}
