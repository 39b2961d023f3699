//! Leave Request API Module (admin approval queue)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leave-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::pending))
        .route("/employees/{id}", get(handler::by_employee))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/deny", post(handler::deny))
        .layer(middleware::from_fn(require_admin))
}
