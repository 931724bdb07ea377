//! Login and logout endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SuccessResponse;
use crate::auth::{bearer_token, constant_time_compare};
use crate::AppState;

/// Role reported for the single administrator account.
pub const ADMIN_ROLE: &str = "administrator";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserInfo,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginFailure {
    pub success: bool,
    pub error: String,
}

/// POST /api/auth/login - Exchange the administrator credentials for a session token.
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    let config = &state.config;

    // Evaluate both comparisons so timing does not reveal which one failed.
    let username_ok = constant_time_compare(&request.username, &config.admin_username);
    let password_ok = constant_time_compare(&request.password, &config.admin_password);

    if !(username_ok & password_ok) {
        tracing::warn!("Rejected login attempt for {:?}", request.username);
        let body = LoginFailure {
            success: false,
            error: "Invalid credentials".to_string(),
        };
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let session = state.sessions.issue(&config.admin_username).await;
    tracing::info!("Issued session for {}", session.username);

    let body = LoginResponse {
        success: true,
        user: UserInfo {
            username: session.username,
            role: ADMIN_ROLE.to_string(),
        },
        token: session.token,
        expires_at: session.expires_at,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// POST /api/auth/logout - Revoke the presented bearer token.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<SuccessResponse> {
    if let Some(token) = bearer_token(&headers) {
        if state.sessions.revoke(token).await {
            tracing::info!("Session revoked");
        }
    }
    Json(SuccessResponse::ok())
}
