//! Leave API Module (admin) — records plus the recycle bin

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leaves", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", axum::routing::delete(handler::soft_delete))
        .route("/employees/{id}/summary", get(handler::employee_summary))
        .route("/recycle-bin", get(handler::recycle_bin))
        .route("/recycle-bin/restore", post(handler::restore))
        .route("/recycle-bin/purge", post(handler::purge))
        .route("/recycle-bin/purge-all", post(handler::purge_all))
        .layer(middleware::from_fn(require_admin))
}
