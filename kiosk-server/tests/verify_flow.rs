//! Verifier behaviour against a real (in-memory) store

mod common;

use kiosk_server::db::repository::{RepoError, employee};
use kiosk_server::verify::{self, VerifyError, VerifyOutcome};
use shared::models::{EmployeeCreate, EmployeeUpdate, FACE_DESCRIPTOR_LEN};

use common::{create_employee, test_pool};

fn descriptor(fill: f32) -> Vec<f32> {
    vec![fill; FACE_DESCRIPTOR_LEN]
}

// ── PIN ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn pin_lookup_requires_exactly_one_match() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-300", Some("4211")).await;

    match verify::pin::verify(&pool, "4211").await.unwrap() {
        VerifyOutcome::Match(v) => {
            assert_eq!(v.employee.id, emp.id);
            assert!(v.confidence.is_none());
        }
        VerifyOutcome::NoMatch => panic!("expected a match"),
    }

    assert!(matches!(
        verify::pin::verify(&pool, "9999").await.unwrap(),
        VerifyOutcome::NoMatch
    ));
}

#[tokio::test]
async fn malformed_pin_is_rejected_before_lookup() {
    let pool = test_pool().await;
    assert!(matches!(
        verify::pin::verify(&pool, "12").await,
        Err(VerifyError::Validation(_))
    ));
    assert!(matches!(
        verify::pin::verify(&pool, "12a4").await,
        Err(VerifyError::Validation(_))
    ));
}

#[tokio::test]
async fn pin_uniqueness_is_enforced_on_enrollment() {
    let pool = test_pool().await;
    create_employee(&pool, "EMP-301", Some("7733")).await;

    // Second employee with the same PIN is refused
    let clash = employee::create(
        &pool,
        EmployeeCreate {
            employee_id: "EMP-302".into(),
            first_name: "Tino".into(),
            surname: "Ncube".into(),
            position: "Foreman".into(),
            department: None,
            pin: Some("7733".into()),
        },
    )
    .await;
    assert!(matches!(clash, Err(RepoError::Duplicate(_))));

    // Stealing the PIN through an update is refused too
    let other = create_employee(&pool, "EMP-303", None).await;
    let steal = employee::update(
        &pool,
        other.id,
        EmployeeUpdate {
            pin: Some("7733".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(steal, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn self_service_pin_change_checks_current_pin() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-304", Some("1111")).await;

    let wrong = employee::change_pin(&pool, emp.id, "0000", "2222").await;
    assert!(matches!(wrong, Err(RepoError::Validation(_))));

    employee::change_pin(&pool, emp.id, "1111", "2222").await.unwrap();
    match verify::pin::verify(&pool, "2222").await.unwrap() {
        VerifyOutcome::Match(v) => assert_eq!(v.employee.id, emp.id),
        VerifyOutcome::NoMatch => panic!("expected a match on the new PIN"),
    }
}

// ── Face ────────────────────────────────────────────────────────────

#[tokio::test]
async fn enrolled_face_matches_with_full_confidence() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-310", None).await;
    employee::enroll_face(&pool, emp.id, &descriptor(0.3)).await.unwrap();

    match verify::face::verify(&pool, &descriptor(0.3)).await.unwrap() {
        VerifyOutcome::Match(v) => {
            assert_eq!(v.employee.id, emp.id);
            assert_eq!(v.confidence, Some(100.0));
        }
        VerifyOutcome::NoMatch => panic!("expected a match"),
    }
}

#[tokio::test]
async fn distant_probe_is_no_match() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-311", None).await;
    employee::enroll_face(&pool, emp.id, &descriptor(0.0)).await.unwrap();

    // Far probe: distance well above the 0.55 threshold
    assert!(matches!(
        verify::face::verify(&pool, &descriptor(1.0)).await.unwrap(),
        VerifyOutcome::NoMatch
    ));
}

#[tokio::test]
async fn re_enrollment_replaces_the_descriptor() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-312", None).await;
    employee::enroll_face(&pool, emp.id, &descriptor(0.0)).await.unwrap();
    employee::enroll_face(&pool, emp.id, &descriptor(1.0)).await.unwrap();

    assert!(matches!(
        verify::face::verify(&pool, &descriptor(0.0)).await.unwrap(),
        VerifyOutcome::NoMatch
    ));
    assert!(matches!(
        verify::face::verify(&pool, &descriptor(1.0)).await.unwrap(),
        VerifyOutcome::Match(_)
    ));
}

// ── Platform credential ─────────────────────────────────────────────

#[tokio::test]
async fn begin_verification_requires_enrollment() {
    let pool = test_pool().await;
    assert!(matches!(
        verify::platform::begin_verification(&pool).await,
        Err(VerifyError::NoEnrollment)
    ));
}

#[tokio::test]
async fn credential_enrollment_then_assertion_roundtrip() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-320", None).await;

    let enroll = verify::platform::begin_enrollment(&pool, emp.id).await.unwrap();
    assert_eq!(enroll.subject_id, emp.employee_id);
    assert_eq!(enroll.subject_name, emp.full_name());
    assert_eq!(enroll.challenge.len(), 64); // 32 bytes hex

    let enrolled = verify::platform::complete_enrollment(
        &pool,
        &enroll.challenge_id,
        "a1b2c3d4e5f6",
        "0defaced0123",
    )
    .await
    .unwrap();
    assert_eq!(enrolled.credential_id.as_deref(), Some("a1b2c3d4e5f6"));

    // Assertion: allow-list carries the credential, completion maps back
    let begin = verify::platform::begin_verification(&pool).await.unwrap();
    assert_eq!(begin.allow_credential_ids, vec!["a1b2c3d4e5f6".to_string()]);

    match verify::platform::complete_verification(&pool, &begin.challenge_id, "A1B2C3D4E5F6")
        .await
        .unwrap()
    {
        VerifyOutcome::Match(v) => assert_eq!(v.employee.id, emp.id),
        VerifyOutcome::NoMatch => panic!("expected a match"),
    }
}

#[tokio::test]
async fn challenges_are_single_use() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-321", None).await;
    let enroll = verify::platform::begin_enrollment(&pool, emp.id).await.unwrap();
    verify::platform::complete_enrollment(&pool, &enroll.challenge_id, "cafe01", "feed02")
        .await
        .unwrap();

    let begin = verify::platform::begin_verification(&pool).await.unwrap();
    verify::platform::complete_verification(&pool, &begin.challenge_id, "cafe01")
        .await
        .unwrap();

    // Replaying the consumed challenge is refused
    assert!(matches!(
        verify::platform::complete_verification(&pool, &begin.challenge_id, "cafe01").await,
        Err(VerifyError::NotAllowed)
    ));
}

#[tokio::test]
async fn rebinding_an_authenticator_is_invalid_state() {
    let pool = test_pool().await;
    let first = create_employee(&pool, "EMP-322", None).await;
    let second = create_employee(&pool, "EMP-323", None).await;

    let enroll = verify::platform::begin_enrollment(&pool, first.id).await.unwrap();
    verify::platform::complete_enrollment(&pool, &enroll.challenge_id, "0b5e55ed", "00ab")
        .await
        .unwrap();

    let enroll2 = verify::platform::begin_enrollment(&pool, second.id).await.unwrap();
    let rebind = verify::platform::complete_enrollment(&pool, &enroll2.challenge_id, "0b5e55ed", "00cd")
        .await;
    assert!(matches!(rebind, Err(VerifyError::InvalidState(_))));
}

#[tokio::test]
async fn malformed_assertion_is_a_device_error() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-324", None).await;
    let enroll = verify::platform::begin_enrollment(&pool, emp.id).await.unwrap();

    let result = verify::platform::complete_enrollment(
        &pool,
        &enroll.challenge_id,
        "not-hex-at-all",
        "00ab",
    )
    .await;
    assert!(matches!(result, Err(VerifyError::DeviceError(_))));
}
