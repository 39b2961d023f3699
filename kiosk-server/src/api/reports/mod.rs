//! Reports API Module (JSON rows; export formatting is a client concern)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/reports",
        Router::new()
            .route("/payroll", get(handler::payroll))
            .route("/late-arrivals", get(handler::late_arrivals))
            .route("/on-leave", get(handler::on_leave))
            .layer(middleware::from_fn(require_admin)),
    )
}
