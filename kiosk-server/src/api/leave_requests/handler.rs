//! Leave Request Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use shared::models::{Leave, LeaveRequest, LeaveRequestApprove};

use crate::core::ServerState;
use crate::db::repository::leave_request;
use crate::leave;
use crate::utils::AppResult;
use crate::utils::time::{day_start_millis, parse_date};

const RESOURCE: &str = "leave_request";

/// GET /api/leave-requests/pending - 待审批队列
pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<Vec<LeaveRequest>>> {
    let requests = leave_request::find_pending(&state.pool).await?;
    Ok(Json(requests))
}

/// GET /api/leave-requests/employees/{id} - 某员工的全部申请
pub async fn by_employee(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let requests = leave_request::find_by_employee(&state.pool, id).await?;
    Ok(Json(requests))
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub request: LeaveRequest,
    pub leave: Leave,
}

/// POST /api/leave-requests/{id}/approve - 批准 (可修改结束日期)
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LeaveRequestApprove>,
) -> AppResult<Json<ApproveResponse>> {
    let end_override = match payload.end_date {
        Some(ref date) => Some(day_start_millis(
            parse_date(date)?,
            state.config.timezone,
        )),
        None => None,
    };

    let (request, leave) = leave::approve_request(&state.pool, id, end_override).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&request))
        .await;
    state
        .broadcast_sync("leave", "created", &leave.id.to_string(), Some(&leave))
        .await;

    Ok(Json(ApproveResponse { request, leave }))
}

/// POST /api/leave-requests/{id}/deny - 驳回 (终态，无副作用)
pub async fn deny(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LeaveRequest>> {
    let request = leave::deny_request(&state.pool, id).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&request))
        .await;

    Ok(Json(request))
}
