//! Platform Credential Verifier
//!
//! WebAuthn-style challenge/response against the kiosk's platform
//! authenticator. The device itself lives at the terminal; the server
//! issues single-use challenges, keeps the allow-list, and maps an
//! asserted credential id back to its owner.
//!
//! Challenges are consumed on completion (even expired ones), so a
//! replayed or abandoned prompt can never resolve to an identity.

use rand::RngCore;
use sqlx::SqlitePool;
use uuid::Uuid;

use shared::client::{CredentialBeginResponse, EnrollCredentialBeginResponse};
use shared::models::Employee;

use super::{VerifiedEmployee, VerifyError, VerifyOutcome};
use crate::db::repository::auth_challenge::{self, CHALLENGE_TTL_MILLIS};
use crate::db::repository::{RepoError, employee};

const PURPOSE_VERIFY: &str = "verify";
const PURPOSE_ENROLL: &str = "enroll";

/// 32 random bytes, hex-encoded, plus a lookup id
fn new_challenge() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    (Uuid::new_v4().to_string(), hex::encode(bytes))
}

fn normalize_credential_id(credential_id: &str) -> Result<String, VerifyError> {
    let normalized = credential_id.to_ascii_lowercase();
    if normalized.is_empty() || hex::decode(&normalized).is_err() {
        return Err(VerifyError::DeviceError(
            "Assertion returned a malformed credential id".to_string(),
        ));
    }
    Ok(normalized)
}

/// Issue an assertion challenge restricted to the enrolled allow-list
pub async fn begin_verification(pool: &SqlitePool) -> Result<CredentialBeginResponse, VerifyError> {
    let enrolled = employee::find_with_credential(pool).await?;
    if enrolled.is_empty() {
        return Err(VerifyError::NoEnrollment);
    }

    let (id, challenge) = new_challenge();
    auth_challenge::create(pool, &id, &challenge, PURPOSE_VERIFY, None).await?;

    Ok(CredentialBeginResponse {
        challenge_id: id,
        challenge,
        allow_credential_ids: enrolled
            .into_iter()
            .filter_map(|e| e.credential_id)
            .collect(),
    })
}

/// Map the device's assertion back to the owning employee
pub async fn complete_verification(
    pool: &SqlitePool,
    challenge_id: &str,
    credential_id: &str,
) -> Result<VerifyOutcome, VerifyError> {
    let row = auth_challenge::take(pool, challenge_id)
        .await?
        .ok_or(VerifyError::NotAllowed)?;

    if row.purpose != PURPOSE_VERIFY
        || shared::util::now_millis() - row.issued_at > CHALLENGE_TTL_MILLIS
    {
        return Err(VerifyError::NotAllowed);
    }

    let credential_id = normalize_credential_id(credential_id)?;

    match employee::find_by_credential_id(pool, &credential_id).await? {
        Some(employee) => Ok(VerifyOutcome::Match(VerifiedEmployee {
            employee,
            confidence: None,
        })),
        None => Ok(VerifyOutcome::NoMatch),
    }
}

/// Issue a creation challenge bound to one employee
pub async fn begin_enrollment(
    pool: &SqlitePool,
    employee_ref: i64,
) -> Result<EnrollCredentialBeginResponse, VerifyError> {
    let emp = employee::find_by_id(pool, employee_ref)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {employee_ref} not found")))?;

    let (id, challenge) = new_challenge();
    auth_challenge::create(pool, &id, &challenge, PURPOSE_ENROLL, Some(employee_ref)).await?;

    let subject_name = emp.full_name();
    Ok(EnrollCredentialBeginResponse {
        challenge_id: id,
        challenge,
        subject_id: emp.employee_id,
        subject_name,
    })
}

/// Persist the created credential; rejects an authenticator that is
/// already bound to a different identity
pub async fn complete_enrollment(
    pool: &SqlitePool,
    challenge_id: &str,
    credential_id: &str,
    public_key: &str,
) -> Result<Employee, VerifyError> {
    let row = auth_challenge::take(pool, challenge_id)
        .await?
        .ok_or(VerifyError::NotAllowed)?;

    let employee_ref = match row.employee_ref {
        Some(id) if row.purpose == PURPOSE_ENROLL => id,
        _ => return Err(VerifyError::NotAllowed),
    };
    if shared::util::now_millis() - row.issued_at > CHALLENGE_TTL_MILLIS {
        return Err(VerifyError::NotAllowed);
    }

    let credential_id = normalize_credential_id(credential_id)?;
    if public_key.is_empty() || hex::decode(public_key).is_err() {
        return Err(VerifyError::DeviceError(
            "Attestation returned a malformed public key".to_string(),
        ));
    }

    // Best-effort pre-check; the UNIQUE index is the authority
    if let Some(owner) = employee::find_by_credential_id(pool, &credential_id).await?
        && owner.id != employee_ref
    {
        return Err(VerifyError::InvalidState(
            "This authenticator is already registered to another employee".to_string(),
        ));
    }

    match employee::enroll_credential(pool, employee_ref, &credential_id, public_key).await {
        Ok(emp) => Ok(emp),
        Err(RepoError::Duplicate(_)) => Err(VerifyError::InvalidState(
            "This authenticator is already registered to another employee".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
