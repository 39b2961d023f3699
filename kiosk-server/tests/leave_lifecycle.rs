//! Leave lifecycle: approvals, extensions, recycle bin, accounting

mod common;

use chrono::Datelike;
use chrono_tz::UTC;
use sqlx::SqlitePool;

use kiosk_server::db::repository::{leave as leave_repo, settings};
use kiosk_server::leave;
use kiosk_server::utils::time::{day_start_millis, today};
use shared::models::{
    LeaveExtensionCreate, LeaveRequestCreate, LeaveRequestStatus, LeaveType, SettingsUpdate,
};

use common::{create_employee, test_pool};

fn date_millis(year: i32, month: u32, day: u32) -> i64 {
    day_start_millis(
        chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        UTC,
    )
}

async fn plant_leave(
    pool: &SqlitePool,
    employee_ref: i64,
    start: i64,
    end: i64,
    kind: LeaveType,
) -> shared::models::Leave {
    leave_repo::create(pool, employee_ref, start, end, kind)
        .await
        .unwrap()
}

#[tokio::test]
async fn approval_creates_leave_and_is_one_shot() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-200", None).await;

    let request = leave::submit_request(
        &pool,
        UTC,
        LeaveRequestCreate {
            employee_ref: emp.id,
            start_date: "2025-06-02".into(),
            end_date: "2025-06-06".into(),
            kind: LeaveType::Vacation,
            reason: Some("family visit".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(request.status, LeaveRequestStatus::Pending);
    assert_eq!(request.employee_name, emp.full_name());

    // Admin trims the end date before confirming
    let override_end = date_millis(2025, 6, 4);
    let (approved, created) = leave::approve_request(&pool, request.id, Some(override_end))
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveRequestStatus::Approved);
    assert_eq!(created.employee_ref, emp.id);
    assert_eq!(created.end_date, override_end);
    assert_eq!(leave::duration_days(created.start_date, created.end_date, UTC), 3);

    // pending -> approved happens exactly once
    let again = leave::approve_request(&pool, request.id, None).await;
    assert!(again.is_err());
    let deny_after = leave::deny_request(&pool, request.id).await;
    assert!(deny_after.is_err());
}

#[tokio::test]
async fn denial_is_terminal_and_has_no_side_effects() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-201", None).await;

    let request = leave::submit_request(
        &pool,
        UTC,
        LeaveRequestCreate {
            employee_ref: emp.id,
            start_date: "2025-07-01".into(),
            end_date: "2025-07-03".into(),
            kind: LeaveType::Sick,
            reason: None,
        },
    )
    .await
    .unwrap();

    let denied = leave::deny_request(&pool, request.id).await.unwrap();
    assert_eq!(denied.status, LeaveRequestStatus::Denied);
    assert!(leave_repo::find_active(&pool).await.unwrap().is_empty());

    assert!(leave::approve_request(&pool, request.id, None).await.is_err());
}

#[tokio::test]
async fn extension_approval_modifies_original_in_place() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-202", None).await;

    let t = today(UTC);
    let original = plant_leave(
        &pool,
        emp.id,
        day_start_millis(t.pred_opt().unwrap(), UTC),
        day_start_millis(t, UTC),
        LeaveType::Sick,
    )
    .await;

    let new_end = t.succ_opt().unwrap().succ_opt().unwrap();
    let request = leave::submit_extension(
        &pool,
        UTC,
        LeaveExtensionCreate {
            employee_ref: emp.id,
            leave_id: original.id,
            new_end_date: new_end.format("%Y-%m-%d").to_string(),
            reason: "still unwell".into(),
        },
    )
    .await
    .unwrap();
    assert!(request.is_extension);
    assert_eq!(request.original_leave_id, Some(original.id));

    let (_, extended) = leave::approve_request(&pool, request.id, None).await.unwrap();
    assert_eq!(extended.id, original.id);
    assert_eq!(extended.end_date, day_start_millis(new_end, UTC));

    // No second leave row appeared
    assert_eq!(leave_repo::find_active(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn rejects_end_date_before_start_date() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-203", None).await;

    let result = leave::submit_request(
        &pool,
        UTC,
        LeaveRequestCreate {
            employee_ref: emp.id,
            start_date: "2025-06-10".into(),
            end_date: "2025-06-09".into(),
            kind: LeaveType::Unpaid,
            reason: None,
        },
    )
    .await;
    assert!(result.is_err());

    let direct = leave_repo::create(
        &pool,
        emp.id,
        date_millis(2025, 6, 10),
        date_millis(2025, 6, 9),
        LeaveType::Unpaid,
    )
    .await;
    assert!(direct.is_err());
}

#[tokio::test]
async fn recycle_bin_restore_and_exact_purge() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-204", None).await;

    let a = plant_leave(&pool, emp.id, date_millis(2025, 1, 6), date_millis(2025, 1, 8), LeaveType::Vacation).await;
    let b = plant_leave(&pool, emp.id, date_millis(2025, 2, 3), date_millis(2025, 2, 5), LeaveType::Sick).await;
    let c = plant_leave(&pool, emp.id, date_millis(2025, 3, 3), date_millis(2025, 3, 4), LeaveType::Unpaid).await;

    leave_repo::soft_delete(&pool, a.id).await.unwrap();
    leave_repo::soft_delete(&pool, b.id).await.unwrap();
    leave_repo::soft_delete(&pool, c.id).await.unwrap();
    assert_eq!(leave_repo::find_deleted(&pool).await.unwrap().len(), 3);

    // Restore clears the flag on exactly the given ids
    assert_eq!(leave_repo::restore(&pool, &[b.id]).await.unwrap(), 1);
    let active = leave_repo::find_active(&pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, b.id);

    // Purge removes exactly the given ids and nothing else
    assert_eq!(leave_repo::purge(&pool, &[a.id]).await.unwrap(), 1);
    assert!(leave_repo::find_by_id(&pool, a.id).await.unwrap().is_none());
    assert!(leave_repo::find_by_id(&pool, c.id).await.unwrap().is_some());
}

#[tokio::test]
async fn purge_all_spares_concurrently_restored_records() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-205", None).await;

    let a = plant_leave(&pool, emp.id, date_millis(2025, 4, 7), date_millis(2025, 4, 9), LeaveType::Vacation).await;
    let b = plant_leave(&pool, emp.id, date_millis(2025, 5, 5), date_millis(2025, 5, 7), LeaveType::Vacation).await;

    leave_repo::soft_delete(&pool, a.id).await.unwrap();
    leave_repo::soft_delete(&pool, b.id).await.unwrap();

    // B is restored between the purge request and its execution; the
    // deleted-set is evaluated at execution time, so B survives
    leave_repo::restore(&pool, &[b.id]).await.unwrap();
    let purged = leave_repo::purge_all(&pool).await.unwrap();
    assert_eq!(purged, 1);

    assert!(leave_repo::find_by_id(&pool, a.id).await.unwrap().is_none());
    let survivor = leave_repo::find_by_id(&pool, b.id).await.unwrap().unwrap();
    assert!(!survivor.deleted);
}

#[tokio::test]
async fn annual_accounting_counts_vacation_started_this_year() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-206", None).await;
    settings::update(
        &pool,
        SettingsUpdate {
            annual_leave_days: Some(21),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let year = today(UTC).year();
    // 5 vacation days + 1 vacation day
    plant_leave(&pool, emp.id, date_millis(year, 1, 6), date_millis(year, 1, 10), LeaveType::Vacation).await;
    plant_leave(&pool, emp.id, date_millis(year, 2, 3), date_millis(year, 2, 3), LeaveType::Vacation).await;
    // Sick leave never counts toward the allowance
    plant_leave(&pool, emp.id, date_millis(year, 3, 3), date_millis(year, 3, 7), LeaveType::Sick).await;
    // Deleted vacation does not count
    let deleted = plant_leave(&pool, emp.id, date_millis(year, 4, 1), date_millis(year, 4, 10), LeaveType::Vacation).await;
    leave_repo::soft_delete(&pool, deleted.id).await.unwrap();

    let summary = leave::summary_for(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(summary.year, year);
    assert_eq!(summary.days_taken, 6);
    assert_eq!(summary.days_remaining, 15);
}

#[tokio::test]
async fn current_leave_is_day_granular_and_end_inclusive() {
    let pool = test_pool().await;
    let emp = create_employee(&pool, "EMP-207", None).await;

    let t = today(UTC);
    // Leave ending today is still current (end-of-day inclusive)
    let current = plant_leave(
        &pool,
        emp.id,
        day_start_millis(t.pred_opt().unwrap(), UTC),
        day_start_millis(t, UTC),
        LeaveType::Sick,
    )
    .await;

    let summary = leave::summary_for(&pool, UTC, emp.id).await.unwrap();
    assert_eq!(summary.current_leave.map(|l| l.id), Some(current.id));

    // A leave that ended yesterday is not current
    leave_repo::soft_delete(&pool, current.id).await.unwrap();
    leave_repo::purge(&pool, &[current.id]).await.unwrap();
    plant_leave(
        &pool,
        emp.id,
        day_start_millis(t.pred_opt().unwrap().pred_opt().unwrap(), UTC),
        day_start_millis(t.pred_opt().unwrap(), UTC),
        LeaveType::Sick,
    )
    .await;
    let summary = leave::summary_for(&pool, UTC, emp.id).await.unwrap();
    assert!(summary.current_leave.is_none());
}
