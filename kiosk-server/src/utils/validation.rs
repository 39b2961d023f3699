//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so every write path
//! goes through these before touching the store.

use shared::models::FACE_DESCRIPTOR_LEN;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Names: first name, surname, position, department
pub const MAX_NAME_LEN: usize = 200;

/// Notes, reasons, notification messages
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: badge numbers, usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate kiosk PIN shape: exactly 4 ASCII digits.
///
/// Runs before any store lookup so malformed input never reaches a query.
pub fn validate_pin(pin: &str) -> Result<(), AppError> {
    if pin.len() != 4 || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "A 4-digit PIN is required".to_string(),
        ));
    }
    Ok(())
}

/// Validate a face descriptor: fixed length, finite components.
pub fn validate_descriptor(descriptor: &[f32]) -> Result<(), AppError> {
    if descriptor.len() != FACE_DESCRIPTOR_LEN {
        return Err(AppError::Validation(format!(
            "Face descriptor must have {FACE_DESCRIPTOR_LEN} components, got {}",
            descriptor.len()
        )));
    }
    if descriptor.iter().any(|v| !v.is_finite()) {
        return Err(AppError::Validation(
            "Face descriptor contains non-finite components".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_shape() {
        assert!(validate_pin("0412").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("12a4").is_err());
        assert!(validate_pin("１２３４").is_err()); // full-width digits are not ASCII
    }

    #[test]
    fn descriptor_shape() {
        assert!(validate_descriptor(&vec![0.0; FACE_DESCRIPTOR_LEN]).is_ok());
        assert!(validate_descriptor(&vec![0.0; 64]).is_err());
        let mut d = vec![0.0; FACE_DESCRIPTOR_LEN];
        d[10] = f32::NAN;
        assert!(validate_descriptor(&d).is_err());
    }

    #[test]
    fn text_limits() {
        assert!(validate_required_text("Miner", "position", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "position", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some("x".repeat(501)), "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "reason", MAX_NOTE_LEN).is_ok());
    }
}
