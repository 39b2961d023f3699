//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公开)
//! - [`auth`] - 管理员登录
//! - [`verify`] - 终端身份验证 (公开)
//! - [`self_service`] - 终端自助接口 (公开)
//! - [`employees`] - 员工管理与凭证登记
//! - [`attendance`] - 考勤记录与在岗视图
//! - [`leaves`] - 休假记录与回收站
//! - [`leave_requests`] - 休假申请审批
//! - [`settings`] - 站点配置
//! - [`notifications`] - 系统告警
//! - [`reports`] - 工时/迟到/休假报表 (JSON)
//! - [`sync`] - 资源版本快照

pub mod attendance;
pub mod auth;
pub mod employees;
pub mod health;
pub mod leave_requests;
pub mod leaves;
pub mod notifications;
pub mod reports;
pub mod self_service;
pub mod settings;
pub mod sync;
pub mod verify;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(verify::router())
        .merge(self_service::router())
        .merge(employees::router())
        .merge(attendance::router())
        .merge(leaves::router())
        .merge(leave_requests::router())
        .merge(settings::router())
        .merge(notifications::router())
        .merge(reports::router())
        .merge(sync::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - the admin dashboard may be served from another origin
        .layer(CorsLayer::permissive())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // JWT authentication - outermost, public kiosk routes skip inside
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
