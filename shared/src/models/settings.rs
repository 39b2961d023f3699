//! Settings Model (singleton)

use serde::{Deserialize, Serialize};

/// Site-wide attendance configuration
///
/// `shift_end` may be numerically before `shift_start` — the shift then
/// crosses midnight and the window end rolls to the next day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Settings {
    pub id: i64,
    /// "HH:mm"
    pub shift_start: String,
    /// "HH:mm"
    pub shift_end: String,
    pub daily_rate: f64,
    /// Per-hour overtime rate
    pub overtime_rate: f64,
    pub annual_leave_days: i64,
    pub updated_at: i64,
}

/// Update settings payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
    pub daily_rate: Option<f64>,
    pub overtime_rate: Option<f64>,
    pub annual_leave_days: Option<i64>,
}
