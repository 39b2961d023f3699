//! Data models
//!
//! Shared between kiosk-server and the terminal/admin frontends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all instants are Unix
//! millis; calendar fields (`YYYY-MM-DD`, `HH:mm`) are converted at the
//! API handler layer.

pub mod attendance;
pub mod employee;
pub mod leave;
pub mod leave_request;
pub mod notification;
pub mod settings;
pub mod sync;
pub mod system_state;

// Re-exports
pub use attendance::*;
pub use employee::*;
pub use leave::*;
pub use leave_request::*;
pub use notification::*;
pub use settings::*;
pub use sync::*;
pub use system_state::*;
