//! Leave Request Model

use serde::{Deserialize, Serialize};

use super::LeaveType;

/// Request decision state; transitions only pending -> approved or
/// pending -> denied, each exactly once
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LeaveRequestStatus {
    Pending,
    Approved,
    Denied,
}

/// Pending ask from an employee, filed at the kiosk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_ref: i64,
    /// Snapshot for the admin view
    pub employee_name: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub kind: LeaveType,
    #[serde(default = "default_status")]
    pub status: LeaveRequestStatus,
    pub reason: Option<String>,
    /// Extension of an existing leave rather than a new one
    #[serde(default)]
    pub is_extension: bool,
    /// Set when `is_extension`
    pub original_leave_id: Option<i64>,
    pub created_at: i64,
}

fn default_status() -> LeaveRequestStatus {
    LeaveRequestStatus::Pending
}

/// New leave request payload (kiosk self-service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestCreate {
    pub employee_ref: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub kind: LeaveType,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Extension request payload (kiosk self-service, requires a current leave)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveExtensionCreate {
    pub employee_ref: i64,
    pub leave_id: i64,
    pub new_end_date: String,
    pub reason: String,
}

/// Approval payload; admin may adjust the end date before confirming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestApprove {
    #[serde(default)]
    pub end_date: Option<String>,
}
