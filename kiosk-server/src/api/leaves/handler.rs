//! Leave API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Leave, LeaveCreate, LeaveIdSelection, LeaveSummary};

use crate::core::ServerState;
use crate::db::repository::{employee, leave};
use crate::leave as leave_engine;
use crate::utils::time::{day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "leave";

/// GET /api/leaves - 全部有效休假记录
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Leave>>> {
    let leaves = leave::find_active(&state.pool).await?;
    Ok(Json(leaves))
}

/// POST /api/leaves - 管理员直接录入休假
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveCreate>,
) -> AppResult<Json<Leave>> {
    let tz = state.config.timezone;
    let start = day_start_millis(parse_date(&payload.start_date)?, tz);
    let end = day_start_millis(parse_date(&payload.end_date)?, tz);

    if employee::find_by_id(&state.pool, payload.employee_ref)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            payload.employee_ref
        )));
    }

    let record = leave::create(&state.pool, payload.employee_ref, start, end, payload.kind).await?;

    let id = record.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&record))
        .await;

    Ok(Json(record))
}

/// DELETE /api/leaves/{id} - 移入回收站 (软删除)
pub async fn soft_delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    leave::soft_delete(&state.pool, id).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
        .await;

    Ok(Json(true))
}

/// GET /api/leaves/employees/{id}/summary - 员工年度休假统计
pub async fn employee_summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LeaveSummary>> {
    let summary = leave_engine::summary_for(&state.pool, state.config.timezone, id).await?;
    Ok(Json(summary))
}

/// GET /api/leaves/recycle-bin - 回收站内容
pub async fn recycle_bin(State(state): State<ServerState>) -> AppResult<Json<Vec<Leave>>> {
    let deleted = leave::find_deleted(&state.pool).await?;
    Ok(Json(deleted))
}

/// POST /api/leaves/recycle-bin/restore - 批量恢复
pub async fn restore(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveIdSelection>,
) -> AppResult<Json<u64>> {
    let restored = leave::restore(&state.pool, &payload.ids).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "restored", "batch", None)
        .await;

    Ok(Json(restored))
}

/// POST /api/leaves/recycle-bin/purge - 永久删除选中记录
pub async fn purge(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveIdSelection>,
) -> AppResult<Json<u64>> {
    let purged = leave::purge(&state.pool, &payload.ids).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "purged", "batch", None)
        .await;

    Ok(Json(purged))
}

/// POST /api/leaves/recycle-bin/purge-all - 清空回收站
///
/// 删除语句在执行时重新求值 deleted 集合；清点之后、执行之前被
/// 并发恢复的记录会幸存。
pub async fn purge_all(State(state): State<ServerState>) -> AppResult<Json<u64>> {
    let purged = leave::purge_all(&state.pool).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "purged", "all", None)
        .await;

    Ok(Json(purged))
}
