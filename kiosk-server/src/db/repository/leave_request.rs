//! Leave Request Repository
//!
//! Decision transitions (approve/deny) are one-shot: the status flip is
//! guarded by `WHERE status = 'pending'` so a second decision on the same
//! request surfaces as a conflict instead of silently re-applying.

use sqlx::SqlitePool;

use shared::models::{LeaveRequest, LeaveType};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, employee_ref, employee_name, start_date, end_date, type, status, \
     reason, is_extension, original_leave_id, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeaveRequest>> {
    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(request)
}

/// Pending requests, earliest start first (admin approval queue)
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE status = 'pending' ORDER BY start_date"
    ))
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

/// All requests filed by one employee, newest first
pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_ref: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE employee_ref = ? ORDER BY created_at DESC"
    ))
    .bind(employee_ref)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

/// File a new request (kiosk self-service), status starts at pending
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    employee_ref: i64,
    employee_name: &str,
    start_date: i64,
    end_date: i64,
    kind: LeaveType,
    reason: Option<&str>,
    original_leave_id: Option<i64>,
) -> RepoResult<LeaveRequest> {
    if end_date < start_date {
        return Err(RepoError::Validation(
            "End date must not be before start date".into(),
        ));
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO leave_request (id, employee_ref, employee_name, start_date, end_date, \
         type, status, reason, is_extension, original_leave_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(employee_ref)
    .bind(employee_name)
    .bind(start_date)
    .bind(end_date)
    .bind(kind)
    .bind(reason)
    .bind(original_leave_id.is_some())
    .bind(original_leave_id)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))
}

/// Deny a pending request (terminal, no side effects)
pub async fn deny(pool: &SqlitePool, id: i64) -> RepoResult<LeaveRequest> {
    let rows = sqlx::query("UPDATE leave_request SET status = 'denied' WHERE id = ? AND status = 'pending'")
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Leave request {id} is not pending"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Leave request {id} not found")))
}
