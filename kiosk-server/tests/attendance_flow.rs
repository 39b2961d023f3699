//! Attendance toggle behaviour against a real (in-memory) store

mod common;

use chrono_tz::UTC;

use kiosk_server::attendance;
use kiosk_server::db::repository::{attendance as attendance_repo, notification, settings};
use shared::models::{DutyStatus, LogType, NotificationKind, SettingsUpdate};

use common::{create_employee, test_pool};

#[tokio::test]
async fn toggle_alternates_in_and_out() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-001", None).await;

    let first = attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(first.receipt.log.kind, LogType::In);
    assert_eq!(first.employee.status, DutyStatus::LoggedIn);
    assert!(first.employee.last_login_time.is_some());
    assert!(first.receipt.shift.is_some());

    let second = attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(second.receipt.log.kind, LogType::Out);
    assert_eq!(second.employee.status, DutyStatus::LoggedOut);
    // last_login_time survives the clock-out for the next login's math
    assert_eq!(
        second.employee.last_login_time,
        first.employee.last_login_time
    );
    assert!(second.receipt.shift.is_none());

    let third = attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(third.receipt.log.kind, LogType::In);

    // Strict alternation in the persisted log
    let logs = attendance_repo::find_by_employee(&pool, emp.id).await.unwrap();
    let kinds: Vec<LogType> = logs.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LogType::In, LogType::Out, LogType::In]);
}

#[tokio::test]
async fn logs_carry_denormalized_snapshots() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-002", None).await;

    let outcome = attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(outcome.receipt.log.employee_name, emp.full_name());
    assert_eq!(outcome.receipt.log.employee_position, emp.position);
    assert!(outcome.receipt.log.notes.is_none());
}

#[tokio::test]
async fn early_clock_out_raises_notification() {
    let pool = test_pool().await;
    // Overnight shift 00:00 -> 00:00 puts the window end on the next
    // midnight, so any same-day clock-out is early
    settings::update(
        &pool,
        SettingsUpdate {
            shift_start: Some("00:00".into()),
            shift_end: Some("00:00".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let emp = create_employee(&pool, "EMP-003", None).await;
    attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    let out = attendance::toggle(&pool, UTC, emp.id).await.unwrap();
    assert!(out.early_clock_out);

    let alerts = notification::find_recent(&pool, 10).await.unwrap();
    let early: Vec<_> = alerts
        .iter()
        .filter(|n| n.kind == NotificationKind::EarlyClockOut)
        .collect();
    assert_eq!(early.len(), 1);
    assert_eq!(early[0].employee_ref, Some(emp.id));
    assert_eq!(early[0].employee_name, emp.full_name());
}

#[tokio::test]
async fn toggle_unknown_employee_is_not_found() {
    let pool = test_pool().await;
    let err = attendance::toggle(&pool, UTC, 424242).await.unwrap_err();
    assert!(matches!(err, kiosk_server::AppError::NotFound(_)));
}
