use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, MessageResponse};
use crate::middleware::AuthUser;
use crate::AppState;
use auth::{Permission, Role};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub message: String,
    pub user_id: String,
    pub role: Role,
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;

    state
        .auth_service
        .register(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
            payload.role.as_deref(),
        )
        .await?;

    Ok(MessageResponse::new("User registered successfully"))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let (token, _user) = state
        .auth_service
        .login(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// GET /api/profile - echo the verified caller
pub async fn profile(AuthUser(principal): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "You are authorized".to_string(),
        user_id: principal.subject_id,
        role: principal.role,
    })
}

/// GET /api/admin-only
pub async fn admin_only(AuthUser(principal): AuthUser) -> Result<Json<MessageResponse>, ApiError> {
    if !principal.can(Permission::AccessAdminConsole) {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    Ok(MessageResponse::new("Welcome SuperAdmin"))
}
