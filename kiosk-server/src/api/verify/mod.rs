//! Kiosk Verification API Module
//!
//! Public routes: the terminal is itself the authentication device.

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/verify", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/methods", get(handler::methods))
        .route("/face", post(handler::face))
        .route("/pin", post(handler::pin))
        .route("/credential/begin", post(handler::credential_begin))
        .route("/credential/complete", post(handler::credential_complete))
}
