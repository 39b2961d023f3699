//! Kiosk Self-Service Handlers

use axum::{Json, extract::State};

use shared::client::ChangePinRequest;
use shared::models::{LeaveExtensionCreate, LeaveRequest, LeaveRequestCreate};

use crate::core::ServerState;
use crate::db::repository::employee;
use crate::leave;
use crate::utils::validation::validate_pin;
use crate::utils::AppResult;

const RESOURCE: &str = "leave_request";

/// POST /api/self/leave-requests - 员工提交休假申请
pub async fn submit_leave_request(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveRequestCreate>,
) -> AppResult<Json<LeaveRequest>> {
    let request = leave::submit_request(&state.pool, state.config.timezone, payload).await?;

    let id = request.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&request))
        .await;

    Ok(Json(request))
}

/// POST /api/self/leave-extensions - 员工提交休假延期申请
pub async fn submit_leave_extension(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveExtensionCreate>,
) -> AppResult<Json<LeaveRequest>> {
    let request = leave::submit_extension(&state.pool, state.config.timezone, payload).await?;

    let id = request.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&request))
        .await;

    Ok(Json(request))
}

/// POST /api/self/change-pin - 员工修改 PIN (需提供当前 PIN)
pub async fn change_pin(
    State(state): State<ServerState>,
    Json(payload): Json<ChangePinRequest>,
) -> AppResult<Json<bool>> {
    validate_pin(&payload.current_pin)?;
    validate_pin(&payload.new_pin)?;

    employee::change_pin(
        &state.pool,
        payload.employee_ref,
        &payload.current_pin,
        &payload.new_pin,
    )
    .await?;

    tracing::info!(employee_ref = payload.employee_ref, "PIN changed at kiosk");
    Ok(Json(true))
}
