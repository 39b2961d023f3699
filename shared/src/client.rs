//! Client-facing API payloads
//!
//! Request/response DTOs shared between kiosk-server and the terminal
//! and admin frontends.

use serde::{Deserialize, Serialize};

use crate::models::{AttendanceLog, EmployeeView, LeaveSummary, LogType, ShiftSnapshot};

// ==================== Admin auth ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

// ==================== Identity verification ====================

/// What a successful verification is for; decides the follow-up action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthPurpose {
    /// Flip duty status and append a log
    Attendance,
    /// Expose the employee's own leave summary, no attendance mutation
    LeaveSelfService,
}

/// Verification method offered at the kiosk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Face,
    PlatformCredential,
    Pin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceVerifyRequest {
    pub purpose: AuthPurpose,
    /// Descriptor extracted from the current camera frame
    pub descriptor: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinVerifyRequest {
    pub purpose: AuthPurpose,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialBeginRequest {
    pub purpose: AuthPurpose,
}

/// Challenge for the kiosk's platform authenticator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialBeginResponse {
    pub challenge_id: String,
    /// 32 random bytes, hex
    pub challenge: String,
    /// Allow-list of enrolled credential ids (hex)
    pub allow_credential_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialCompleteRequest {
    pub purpose: AuthPurpose,
    pub challenge_id: String,
    /// Credential id asserted by the authenticator (hex)
    pub credential_id: String,
}

/// Confirmation for an attendance toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleReceipt {
    pub log: AttendanceLog,
    /// Present on clock-in; the window the confirmation screen counts down
    pub shift: Option<ShiftSnapshot>,
}

impl ToggleReceipt {
    pub fn clocked_in(&self) -> bool {
        self.log.kind == LogType::In
    }
}

/// Outcome of a successful verification, shaped by the purpose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub employee: EmployeeView,
    /// Face path only: `(1 - distance) * 100`
    pub confidence: Option<f64>,
    pub attendance: Option<ToggleReceipt>,
    pub leave: Option<LeaveSummary>,
}

/// One verification attempt; NoMatch is a normal outcome, not an error —
/// the kiosk keeps scanning or falls back to the next method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAttempt {
    pub matched: bool,
    pub result: Option<VerifyResponse>,
}

impl VerifyAttempt {
    pub fn no_match() -> Self {
        Self {
            matched: false,
            result: None,
        }
    }

    pub fn matched(result: VerifyResponse) -> Self {
        Self {
            matched: true,
            result: Some(result),
        }
    }
}

// ==================== Credential enrollment (admin) ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollCredentialBeginResponse {
    pub challenge_id: String,
    pub challenge: String,
    /// Passed to the authenticator as user id / display name
    pub subject_id: String,
    pub subject_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollCredentialCompleteRequest {
    pub challenge_id: String,
    pub credential_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollFaceRequest {
    pub descriptor: Vec<f32>,
}

/// Kiosk self-service PIN change; requires the current PIN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePinRequest {
    pub employee_ref: i64,
    pub current_pin: String,
    pub new_pin: String,
}
