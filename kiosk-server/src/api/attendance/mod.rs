//! Attendance API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/recent", get(handler::recent))
        .route("/on-duty", get(handler::on_duty))
        .route("/employees/{id}/logs", get(handler::employee_logs))
        .route("/employees/{id}/pairs", get(handler::employee_pairs))
}
