//! Credential Verifiers
//!
//! Three independent strategies map presented evidence to at most one
//! employee:
//!
//! - [`face`] - descriptor distance matching against enrolled faces
//! - [`platform`] - device-bound public-key credential challenge/response
//! - [`pin`] - 4-digit kiosk code lookup
//!
//! [`resolve`] orchestrates them for an authentication purpose (attendance
//! toggle vs. leave self-service) and runs the follow-up action.

pub mod face;
pub mod pin;
pub mod platform;
pub mod resolve;

use shared::models::Employee;
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Face-match acceptance threshold (Euclidean distance).
///
/// A candidate is accepted only strictly below this; a distance exactly at
/// the threshold is a NoMatch.
pub const FACE_MATCH_THRESHOLD: f64 = 0.55;

/// A verifier's positive result
#[derive(Debug, Clone)]
pub struct VerifiedEmployee {
    pub employee: Employee,
    /// Face path only: `(1 - distance) * 100`
    pub confidence: Option<f64>,
}

/// Outcome of a verification attempt
///
/// NoMatch is not an error: the kiosk falls back to the next method.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Match(VerifiedEmployee),
    NoMatch,
}

/// Verifier failure taxonomy
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Integrity violation (e.g. duplicate PIN); abort rather than guess
    #[error("Ambiguous match: {0}")]
    AmbiguousMatch(String),

    /// No credentials of the requested kind are enrolled
    #[error("No credentials are enrolled")]
    NoEnrollment,

    /// The prompt was cancelled, timed out, or replayed
    #[error("Authentication was cancelled or timed out")]
    NotAllowed,

    /// The authenticator returned something unusable
    #[error("Authenticator device error: {0}")]
    DeviceError(String),

    /// The authenticator is already bound to a different identity
    #[error("Credential already registered: {0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<VerifyError> for AppError {
    fn from(e: VerifyError) -> Self {
        match e {
            // Duplicate credential material means the store no longer
            // satisfies the uniqueness invariant; treat as a server fault
            VerifyError::AmbiguousMatch(msg) => {
                AppError::Internal(format!("Credential integrity violation: {msg}"))
            }
            VerifyError::NoEnrollment => {
                AppError::BusinessRule("No credentials are enrolled in the system".to_string())
            }
            VerifyError::NotAllowed => {
                AppError::Invalid("Authentication was cancelled or timed out".to_string())
            }
            VerifyError::DeviceError(msg) => {
                AppError::Invalid(format!("Authenticator error: {msg}"))
            }
            VerifyError::InvalidState(msg) => AppError::Conflict(msg),
            VerifyError::Validation(msg) => AppError::Validation(msg),
            VerifyError::Repo(e) => e.into(),
        }
    }
}
