//! Sync Status Handler

use axum::{Json, extract::State};

use shared::models::SyncStatus;

use crate::core::ServerState;

/// GET /api/sync/status - 实例 epoch 与各资源版本号
///
/// 客户端重连时比对 epoch / 版本差判断是否需要全量刷新。
pub async fn status(State(state): State<ServerState>) -> Json<SyncStatus> {
    Json(state.sync_status())
}
