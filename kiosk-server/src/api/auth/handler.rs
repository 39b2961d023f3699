//! Authentication Handlers
//!
//! Admin login and token introspection

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use shared::client::{LoginRequest, LoginResponse};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::admin_account;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates the admin account and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = admin_account::get(&state.pool).await?;

    // Fixed delay before checking the result, same path for all failures
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(a) if a.username == req.username => a,
        _ => {
            security_log!(WARN, "login_failed", username = %req.username, reason = "unknown_user");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = password::verify_password(&req.password, &account.hash_pass)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        security_log!(WARN, "login_failed", username = %req.username, reason = "invalid_password");
        return Err(AppError::invalid_credentials());
    }

    let (token, expires_in) = state
        .jwt_service
        .generate_token(&account.username, "admin")
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    security_log!(INFO, "login_success", username = %account.username);
    tracing::info!(username = %account.username, "Administrator logged in");

    Ok(Json(LoginResponse {
        token,
        username: account.username,
        expires_in,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub role: String,
}

/// Current token holder
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
        role: user.role,
    })
}

#[derive(Debug, serde::Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the admin password (requires the current one)
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<bool>> {
    crate::utils::validation::validate_required_text(
        &req.new_password,
        "new_password",
        crate::utils::validation::MAX_PASSWORD_LEN,
    )?;

    let account = admin_account::get(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin account not found".into()))?;

    let current_valid = password::verify_password(&req.current_password, &account.hash_pass)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !current_valid {
        security_log!(WARN, "password_change_failed", username = %user.username);
        return Err(AppError::invalid_credentials());
    }

    let hash = password::hash_password(&req.new_password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?;
    admin_account::update_password(&state.pool, &hash).await?;

    security_log!(INFO, "password_changed", username = %user.username);
    Ok(Json(true))
}
