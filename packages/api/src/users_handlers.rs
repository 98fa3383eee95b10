// ABOUTME: HTTP request handlers for user operations
// ABOUTME: Exposes the current user's profile and usage fields

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use repolens_storage::User;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

/// Profile returned by GET /api/me. Usage fields are display data only;
/// nothing in this slice increments or enforces them.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub max_usage: i64,
    pub usage: i64,
    pub created_at: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            provider: user.provider,
            max_usage: user.max_usage,
            usage: user.usage,
            created_at: user.created_at,
        }
    }
}

/// Get the current user backing the session
pub async fn get_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    info!("Getting current user {}", current_user.id);

    let user = state
        .db
        .user_storage
        .get_user(&current_user.id)
        .await
        .map_err(|e| match e {
            repolens_storage::StorageError::NotFound => {
                ApiError::NotFound("User not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(user.into()))
}
