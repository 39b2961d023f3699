//! Shared types for the Shiftline kiosk system
//!
//! Data models, message-bus payloads and small utilities used by both
//! the kiosk server and the terminal/admin clients that talk to it.

pub mod client;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType};
