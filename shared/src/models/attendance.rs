//! Attendance Log Model

use serde::{Deserialize, Serialize};

/// Clock event direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LogType {
    In,
    Out,
}

/// Append-only attendance event
///
/// `employee_name`/`employee_position` are point-in-time snapshots so the
/// live feed and history survive employee deletion. Never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceLog {
    pub id: i64,
    pub employee_ref: i64,
    pub timestamp: i64,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub kind: LogType,
    pub employee_name: String,
    pub employee_position: String,
    /// e.g. "auto clock-out" on reconciliation repairs
    pub notes: Option<String>,
}

/// One completed in/out pair from the pairing scan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendancePair {
    pub clock_in: i64,
    pub clock_out: i64,
}

impl AttendancePair {
    pub fn duration_millis(&self) -> i64 {
        self.clock_out - self.clock_in
    }
}

/// Shift window snapshot returned with a clock-in confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSnapshot {
    /// Window start/end on the login's calendar day (end rolled to the
    /// next day for overnight shifts)
    pub shift_start_at: i64,
    pub shift_end_at: i64,
    /// Elapsed fraction of the shift, clamped to [0, 1]
    pub progress: f64,
    pub overtime_millis: i64,
}

/// Payroll report row (JSON only; export formatting is a client concern)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRow {
    pub employee_ref: i64,
    pub employee_name: String,
    pub days_worked: i64,
    pub overtime_hours: f64,
    pub base_pay: f64,
    pub overtime_pay: f64,
    pub gross_pay: f64,
}

/// Late arrival report row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateArrivalRow {
    pub employee_ref: i64,
    pub employee_name: String,
    pub clock_in: i64,
    /// Minutes past shift start
    pub minutes_late: i64,
}
