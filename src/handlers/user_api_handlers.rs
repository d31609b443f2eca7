use crate::error::{AppError, Result};
use crate::models::user::PublicUser;
use crate::services::user_service::CreateUserRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// GET /api/users - All users, newest first, without password hashes
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| AppError::internal("Failed to fetch users", e))?;

    Ok(Json(users))
}

/// POST /api/users - Register a user from `{name?, email, password}`
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>)> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected user payload");
        AppError::Validation("Invalid request body".to_string())
    })?;

    let request = CreateUserRequest {
        name: payload.name,
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
    };

    let user = state.user_service.create_user(request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
