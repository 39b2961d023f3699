//! Employee API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Employee router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可（值班面板需要员工列表）
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：仅管理员可用
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/face", post(handler::enroll_face))
        .route("/{id}/credential/begin", post(handler::credential_begin))
        .route(
            "/{id}/credential/complete",
            post(handler::credential_complete),
        )
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
