//! PIN Verifier
//!
//! Exact-equality lookup on the 4-digit kiosk code. Exactly one match is
//! required: zero rows is a NoMatch, more than one is an integrity fault
//! the verifier refuses to guess around (the partial UNIQUE index should
//! make that impossible).

use sqlx::SqlitePool;

use super::{VerifiedEmployee, VerifyError, VerifyOutcome};
use crate::db::repository::employee;
use crate::utils::validation::validate_pin;

pub async fn verify(pool: &SqlitePool, pin: &str) -> Result<VerifyOutcome, VerifyError> {
    // Shape gate before any store read
    validate_pin(pin).map_err(|e| VerifyError::Validation(e.to_string()))?;

    let mut holders = employee::find_by_pin(pool, pin).await?;

    if holders.len() > 1 {
        return Err(VerifyError::AmbiguousMatch(format!(
            "{} employees share the same PIN",
            holders.len()
        )));
    }

    match holders.pop() {
        Some(employee) => Ok(VerifyOutcome::Match(VerifiedEmployee {
            employee,
            confidence: None,
        })),
        None => Ok(VerifyOutcome::NoMatch),
    }
}
