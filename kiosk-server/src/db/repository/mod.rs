//! Repository Module
//!
//! CRUD operations over the SQLite tables. Free async functions taking a
//! pool reference; multi-statement state transitions (attendance toggle,
//! approval, reconciliation) own their transactions in the engine modules.

// Identity
pub mod admin_account;
pub mod employee;

// Attendance
pub mod attendance;

// Leave
pub mod leave;
pub mod leave_request;

// System
pub mod auth_challenge;
pub mod notification;
pub mod settings;
pub mod system_state;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // Partial UNIQUE indexes are the uniqueness authority for
        // pin / credential_id / employee_id; surface violations as Duplicate
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
