//! Settings API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/settings",
        Router::new()
            .route("/", get(handler::get).put(handler::update))
            .layer(middleware::from_fn(require_admin)),
    )
}
