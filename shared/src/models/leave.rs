//! Leave Model (批准的缺勤区间)

use serde::{Deserialize, Serialize};

/// Leave category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum LeaveType {
    Sick,
    Vacation,
    Unpaid,
}

/// Approved absence interval, inclusive day bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Leave {
    pub id: i64,
    pub employee_ref: i64,
    /// Local midnight of the first day, Unix millis
    pub start_date: i64,
    /// Local midnight of the last day (inclusive), Unix millis
    pub end_date: i64,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub kind: LeaveType,
    /// Soft-delete flag; recycle bin lists `deleted = true` rows
    #[serde(default)]
    pub deleted: bool,
    pub updated_at: i64,
}

/// Create leave payload (admin direct entry)
///
/// Dates as `YYYY-MM-DD`, converted at the handler layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveCreate {
    pub employee_ref: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub kind: LeaveType,
}

/// Recycle-bin batch selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveIdSelection {
    pub ids: Vec<i64>,
}

/// On-leave report row (leave joined with the employee roster)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnLeaveRow {
    pub employee_ref: i64,
    pub employee_name: String,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub kind: LeaveType,
    pub start_date: i64,
    pub end_date: i64,
    pub duration_days: i64,
}

/// Per-employee annual leave accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSummary {
    pub year: i32,
    pub days_taken: i64,
    /// May be negative; display floor at zero is the caller's concern
    pub days_remaining: i64,
    pub current_leave: Option<Leave>,
    pub history: Vec<Leave>,
}
