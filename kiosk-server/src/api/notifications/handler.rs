//! Notification Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::Notification;

use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::AppResult;

const RESOURCE: &str = "notification";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
}

fn default_limit() -> i32 {
    100
}

/// GET /api/notifications - 最近告警 (未读在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications =
        notification::find_recent(&state.pool, query.limit.clamp(1, 500)).await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count - 未读数量 (角标)
pub async fn unread_count(State(state): State<ServerState>) -> AppResult<Json<i64>> {
    let count = notification::count_unread(&state.pool).await?;
    Ok(Json(count))
}

/// POST /api/notifications/{id}/read - 标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    notification::mark_read(&state.pool, id).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "updated", &id.to_string(), None)
        .await;

    Ok(Json(true))
}

/// POST /api/notifications/read-all - 全部标记已读
pub async fn mark_all_read(State(state): State<ServerState>) -> AppResult<Json<u64>> {
    let updated = notification::mark_all_read(&state.pool).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "updated", "all", None)
        .await;

    Ok(Json(updated))
}
