//! Employee Model

use serde::{Deserialize, Serialize};

/// Length of a face descriptor vector (FaceNet-style embedding).
pub const FACE_DESCRIPTOR_LEN: usize = 128;

/// Duty status (在岗状态)
///
/// Only flipped by the attendance engine and the daily reconciliation
/// job. "On leave" is derived from the leave table, never stored here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DutyStatus {
    LoggedIn,
    LoggedOut,
}

impl Default for DutyStatus {
    fn default() -> Self {
        Self::LoggedOut
    }
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,

    /// Human-facing badge number, unique
    pub employee_id: String,

    pub first_name: String,
    pub surname: String,
    pub position: String,
    pub department: Option<String>,

    #[serde(default)]
    pub status: DutyStatus,

    /// Set only when transitioning to LoggedIn; kept across clock-out
    /// for shift-progress math on the next login
    pub last_login_time: Option<i64>,

    /// 4-digit kiosk code, unique among employees that have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    /// Enrolled face descriptor (JSON column)
    #[cfg_attr(feature = "db", sqlx(json(nullable)))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_descriptor: Option<Vec<f32>>,

    /// Platform credential binding (hex), unique
    pub credential_id: Option<String>,
    pub public_key: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// "First Surname" snapshot used on denormalized log/request rows
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Employee view for list/detail responses
///
/// Enrollment state is exposed as booleans; the descriptor, PIN and
/// credential material never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub surname: String,
    pub position: String,
    pub department: Option<String>,
    pub status: DutyStatus,
    pub last_login_time: Option<i64>,
    pub has_pin: bool,
    pub face_enrolled: bool,
    pub credential_enrolled: bool,
    pub created_at: i64,
}

impl From<&Employee> for EmployeeView {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            employee_id: e.employee_id.clone(),
            first_name: e.first_name.clone(),
            surname: e.surname.clone(),
            position: e.position.clone(),
            department: e.department.clone(),
            status: e.status,
            last_login_time: e.last_login_time,
            has_pin: e.pin.is_some(),
            face_enrolled: e.face_descriptor.is_some(),
            credential_enrolled: e.credential_id.is_some(),
            created_at: e.created_at,
        }
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub first_name: String,
    pub surname: String,
    pub position: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Optional initial PIN (4 digits)
    #[serde(default)]
    pub pin: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}
