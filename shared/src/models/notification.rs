//! Notification Model

use serde::{Deserialize, Serialize};

/// System-authored alert kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum NotificationKind {
    MissedLogout,
    DailyReportReady,
    EarlyClockOut,
}

/// Admin-facing alert row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    /// None for system-wide notices (daily report)
    pub employee_ref: Option<i64>,
    pub employee_name: String,
    pub timestamp: i64,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}
