//! Attendance State Machine
//!
//! - [`engine`] - the duty-status toggle and report aggregation
//! - [`pairing`] - in/out log pairing for history views
//! - [`shift`] - shift window, progress and overtime arithmetic

pub mod engine;
pub mod pairing;
pub mod shift;

pub use engine::{ToggleOutcome, toggle};
pub use pairing::pair_logs;
pub use shift::{ShiftWindow, shift_window};
