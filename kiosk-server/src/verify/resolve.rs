//! Identity Resolution
//!
//! Orchestrates the verifiers for an authentication purpose. A verified
//! employee is either run through the attendance toggle (purpose
//! `Attendance`) or handed their own leave summary (purpose
//! `LeaveSelfService`) without touching attendance state.

use shared::client::{AuthMethod, AuthPurpose, VerifyResponse};
use shared::models::EmployeeView;

use super::VerifiedEmployee;
use crate::attendance;
use crate::core::ServerState;
use crate::leave;
use crate::utils::AppResult;

/// Methods the kiosk should offer
///
/// Face is always available; the platform credential appears only when
/// the terminal reports authenticator support, with PIN as the fallback.
/// After a credential failure the kiosk falls back to PIN on its own —
/// the PIN endpoint accepts attempts regardless of this listing.
pub fn available_methods(platform_supported: bool) -> Vec<AuthMethod> {
    if platform_supported {
        vec![AuthMethod::Face, AuthMethod::PlatformCredential]
    } else {
        vec![AuthMethod::Face, AuthMethod::Pin]
    }
}

/// Run the purpose-specific follow-up for a verified employee
pub async fn finish(
    state: &ServerState,
    purpose: AuthPurpose,
    method: AuthMethod,
    verified: VerifiedEmployee,
) -> AppResult<VerifyResponse> {
    let VerifiedEmployee {
        employee,
        confidence,
    } = verified;

    tracing::info!(
        employee_ref = employee.id,
        employee_id = %employee.employee_id,
        ?method,
        ?purpose,
        "Identity verified at kiosk"
    );

    match purpose {
        AuthPurpose::Attendance => {
            let outcome =
                attendance::toggle(&state.pool, state.config.timezone, employee.id).await?;

            let id = outcome.employee.id.to_string();
            let view = EmployeeView::from(&outcome.employee);
            state
                .broadcast_sync("employee", "updated", &id, Some(&view))
                .await;
            state
                .broadcast_sync(
                    "attendance",
                    "created",
                    &outcome.receipt.log.id.to_string(),
                    Some(&outcome.receipt.log),
                )
                .await;
            if outcome.early_clock_out {
                state
                    .broadcast_sync::<()>("notification", "created", &id, None)
                    .await;
            }

            Ok(VerifyResponse {
                employee: view,
                confidence,
                attendance: Some(outcome.receipt),
                leave: None,
            })
        }
        AuthPurpose::LeaveSelfService => {
            let summary =
                leave::summary_for(&state.pool, state.config.timezone, employee.id).await?;
            Ok(VerifyResponse {
                employee: EmployeeView::from(&employee),
                confidence,
                attendance: None,
                leave: Some(summary),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_is_always_offered() {
        assert!(available_methods(true).contains(&AuthMethod::Face));
        assert!(available_methods(false).contains(&AuthMethod::Face));
    }

    #[test]
    fn pin_replaces_unsupported_platform_credential() {
        let with_platform = available_methods(true);
        assert!(with_platform.contains(&AuthMethod::PlatformCredential));
        assert!(!with_platform.contains(&AuthMethod::Pin));

        let without_platform = available_methods(false);
        assert!(!without_platform.contains(&AuthMethod::PlatformCredential));
        assert!(without_platform.contains(&AuthMethod::Pin));
    }
}
