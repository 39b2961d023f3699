//! Face Verifier
//!
//! The kiosk extracts a descriptor from the current camera frame and posts
//! it here. Matching is a linear scan over enrolled descriptors: smallest
//! Euclidean distance wins, accepted only strictly below
//! [`FACE_MATCH_THRESHOLD`]. Enrollment stores one descriptor verbatim —
//! no averaging across samples.

use sqlx::SqlitePool;

use shared::models::Employee;

use super::{FACE_MATCH_THRESHOLD, VerifiedEmployee, VerifyError, VerifyOutcome};
use crate::db::repository::employee;
use crate::utils::validation::validate_descriptor;

/// Euclidean distance between two descriptors of equal length
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Pick the enrolled employee closest to the probe, if any is below
/// threshold. Ties below threshold resolve to the smallest distance.
pub fn match_descriptor<'a>(
    candidates: &'a [Employee],
    probe: &[f32],
) -> Option<(&'a Employee, f64)> {
    let mut best: Option<(&Employee, f64)> = None;

    for emp in candidates {
        let Some(stored) = emp.face_descriptor.as_deref() else {
            continue;
        };
        // Length mismatch means a foreign or corrupt enrollment; skip it
        if stored.len() != probe.len() {
            continue;
        }
        let distance = euclidean_distance(probe, stored);
        if distance < FACE_MATCH_THRESHOLD
            && best.map_or(true, |(_, d)| distance < d)
        {
            best = Some((emp, distance));
        }
    }

    best
}

/// Verify a presented descriptor against all enrolled employees
pub async fn verify(pool: &SqlitePool, descriptor: &[f32]) -> Result<VerifyOutcome, VerifyError> {
    validate_descriptor(descriptor).map_err(|e| VerifyError::Validation(e.to_string()))?;

    let candidates = employee::find_with_face(pool).await?;

    match match_descriptor(&candidates, descriptor) {
        Some((emp, distance)) => Ok(VerifyOutcome::Match(VerifiedEmployee {
            employee: emp.clone(),
            confidence: Some((1.0 - distance) * 100.0),
        })),
        None => Ok(VerifyOutcome::NoMatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DutyStatus, FACE_DESCRIPTOR_LEN};

    fn employee_with_descriptor(id: i64, descriptor: Vec<f32>) -> Employee {
        Employee {
            id,
            employee_id: format!("EMP-{id}"),
            first_name: "Test".into(),
            surname: format!("Employee{id}"),
            position: "Miner".into(),
            department: None,
            status: DutyStatus::LoggedOut,
            last_login_time: None,
            pin: None,
            face_descriptor: Some(descriptor),
            credential_id: None,
            public_key: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn descriptor(fill: f32) -> Vec<f32> {
        vec![fill; FACE_DESCRIPTOR_LEN]
    }

    #[test]
    fn identical_descriptor_is_distance_zero() {
        let probe = descriptor(0.25);
        let candidates = vec![employee_with_descriptor(1, probe.clone())];
        let (emp, distance) = match_descriptor(&candidates, &probe).unwrap();
        assert_eq!(emp.id, 1);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn distance_exactly_at_threshold_is_no_match() {
        // One component differs by exactly the threshold
        let mut stored = descriptor(0.0);
        stored[0] = FACE_MATCH_THRESHOLD as f32;
        let candidates = vec![employee_with_descriptor(1, stored)];
        let probe = descriptor(0.0);

        let d = euclidean_distance(&probe, candidates[0].face_descriptor.as_ref().unwrap());
        assert!((d - FACE_MATCH_THRESHOLD).abs() < 1e-9);
        assert!(match_descriptor(&candidates, &probe).is_none());
    }

    #[test]
    fn closest_candidate_below_threshold_wins() {
        let mut near = descriptor(0.0);
        near[0] = 0.1;
        let mut nearer = descriptor(0.0);
        nearer[0] = 0.05;
        let mut far = descriptor(0.0);
        far[0] = 0.9;

        let candidates = vec![
            employee_with_descriptor(1, near),
            employee_with_descriptor(2, nearer),
            employee_with_descriptor(3, far),
        ];
        let (emp, distance) = match_descriptor(&candidates, &descriptor(0.0)).unwrap();
        assert_eq!(emp.id, 2);
        assert!((distance - 0.05).abs() < 1e-6);
    }

    #[test]
    fn mismatched_length_enrollment_is_skipped() {
        let candidates = vec![employee_with_descriptor(1, vec![0.0; 64])];
        assert!(match_descriptor(&candidates, &descriptor(0.0)).is_none());
    }

    #[test]
    fn confidence_formula() {
        // distance 0.2 -> confidence 80%
        let confidence: f64 = (1.0 - 0.2) * 100.0;
        assert!((confidence - 80.0).abs() < 1e-9);
    }
}
