//! Kiosk Self-Service API Module
//!
//! Public routes used from the kiosk confirmation screen after a
//! successful verification: filing leave requests and changing the PIN.
//! The PIN change still demands the current PIN.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/self", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/leave-requests", post(handler::submit_leave_request))
        .route("/leave-extensions", post(handler::submit_leave_extension))
        .route("/change-pin", post(handler::change_pin))
}
