//! Daily reconciliation behaviour: repairs, idempotency guard, notifications

mod common;

use chrono_tz::UTC;
use sqlx::SqlitePool;

use kiosk_server::db::repository::{attendance as attendance_repo, employee, notification};
use kiosk_server::reconcile::{self, RunOutcome};
use kiosk_server::utils::time::{date_hms_to_millis, end_of_day_millis, today};
use shared::models::{DutyStatus, LogType, NotificationKind};

use common::{create_employee, test_pool};

/// Force an employee into the stale-login shape: logged in yesterday,
/// never clocked out
async fn plant_stale_login(pool: &SqlitePool, employee_ref: i64, login_millis: i64) {
    sqlx::query("UPDATE employee SET status = 'LOGGED_IN', last_login_time = ? WHERE id = ?")
        .bind(login_millis)
        .bind(employee_ref)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn stale_login_is_force_closed_with_synthetic_log() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-100", None).await;

    let yesterday = today(UTC).pred_opt().unwrap();
    let login = date_hms_to_millis(yesterday, chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(), UTC);
    plant_stale_login(&pool, emp.id, login).await;

    let outcome = reconcile::run_daily_tasks(&pool, UTC).await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed { repaired: 1 });

    // Status repaired
    let repaired = employee::find_by_id(&pool, emp.id).await.unwrap().unwrap();
    assert_eq!(repaired.status, DutyStatus::LoggedOut);

    // Exactly one synthetic out at 23:59:59.999 on the login day
    let logs = attendance_repo::find_by_employee(&pool, emp.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].kind, LogType::Out);
    assert_eq!(logs[0].timestamp, end_of_day_millis(yesterday, UTC));
    assert_eq!(logs[0].notes.as_deref(), Some("auto clock-out"));

    // One missed-logout referencing the employee, one report notice
    let alerts = notification::find_recent(&pool, 50).await.unwrap();
    let missed: Vec<_> = alerts
        .iter()
        .filter(|n| n.kind == NotificationKind::MissedLogout)
        .collect();
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].employee_ref, Some(emp.id));

    let reports: Vec<_> = alerts
        .iter()
        .filter(|n| n.kind == NotificationKind::DailyReportReady)
        .collect();
    assert_eq!(reports.len(), 1);
}

#[tokio::test]
async fn second_run_on_same_day_is_a_no_op() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-101", None).await;

    let yesterday = today(UTC).pred_opt().unwrap();
    let login = date_hms_to_millis(yesterday, chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(), UTC);
    plant_stale_login(&pool, emp.id, login).await;

    let first = reconcile::run_daily_tasks(&pool, UTC).await.unwrap();
    assert_eq!(first, RunOutcome::Completed { repaired: 1 });

    // Replant the stale shape; the guard must still skip today
    plant_stale_login(&pool, emp.id, login).await;
    let second = reconcile::run_daily_tasks(&pool, UTC).await.unwrap();
    assert_eq!(second, RunOutcome::Skipped);

    // No duplicate logs or notifications
    let logs = attendance_repo::find_by_employee(&pool, emp.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    let alerts = notification::find_recent(&pool, 50).await.unwrap();
    assert_eq!(
        alerts
            .iter()
            .filter(|n| n.kind == NotificationKind::DailyReportReady)
            .count(),
        1
    );
}

#[tokio::test]
async fn todays_logins_are_left_alone() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-102", None).await;

    // Logged in today: not stale, must survive reconciliation
    let login = date_hms_to_millis(today(UTC), chrono::NaiveTime::from_hms_opt(6, 0, 0).unwrap(), UTC);
    plant_stale_login(&pool, emp.id, login).await;

    let outcome = reconcile::run_daily_tasks(&pool, UTC).await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed { repaired: 0 });

    let untouched = employee::find_by_id(&pool, emp.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, DutyStatus::LoggedIn);
    assert!(attendance_repo::find_by_employee(&pool, emp.id)
        .await
        .unwrap()
        .is_empty());
}
