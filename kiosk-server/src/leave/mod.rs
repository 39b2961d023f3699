//! Leave Lifecycle Engine
//!
//! Request decisions, extension handling, the recycle-bin model and
//! annual leave accounting. Approvals run as one transaction: the
//! one-shot status flip (`WHERE status = 'pending'`) and the leave
//! creation/extension commit together or not at all.

use chrono::Datelike;
use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::models::{
    Leave, LeaveExtensionCreate, LeaveRequest, LeaveRequestCreate, LeaveSummary,
};
use shared::util::{now_millis, snowflake_id};

use crate::db::repository::{employee, leave, leave_request, settings};
use crate::utils::time::{day_start_millis, local_date_of, parse_date, today};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// Inclusive duration in days at day granularity; equal bounds count as 1
pub fn duration_days(start_millis: i64, end_millis: i64, tz: Tz) -> i64 {
    let start = local_date_of(start_millis, tz);
    let end = local_date_of(end_millis, tz);
    (end - start).num_days() + 1
}

/// File a new leave request from the kiosk
pub async fn submit_request(
    pool: &SqlitePool,
    tz: Tz,
    data: LeaveRequestCreate,
) -> AppResult<LeaveRequest> {
    validate_optional_text(&data.reason, "reason", MAX_NOTE_LEN)?;
    let start = day_start_millis(parse_date(&data.start_date)?, tz);
    let end = day_start_millis(parse_date(&data.end_date)?, tz);
    if end < start {
        return Err(AppError::Validation(
            "End date must not be before start date".into(),
        ));
    }

    let emp = employee::find_by_id(pool, data.employee_ref)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", data.employee_ref)))?;

    let request = leave_request::create(
        pool,
        emp.id,
        &emp.full_name(),
        start,
        end,
        data.kind,
        data.reason.as_deref(),
        None,
    )
    .await?;
    Ok(request)
}

/// File an extension request against a current leave
pub async fn submit_extension(
    pool: &SqlitePool,
    tz: Tz,
    data: LeaveExtensionCreate,
) -> AppResult<LeaveRequest> {
    if data.reason.trim().is_empty() {
        return Err(AppError::Validation(
            "A reason is required for an extension request".into(),
        ));
    }
    validate_optional_text(&Some(data.reason.clone()), "reason", MAX_NOTE_LEN)?;

    let original = leave::find_by_id(pool, data.leave_id)
        .await?
        .filter(|l| !l.deleted && l.employee_ref == data.employee_ref)
        .ok_or_else(|| AppError::NotFound(format!("Leave {} not found", data.leave_id)))?;

    let new_end = day_start_millis(parse_date(&data.new_end_date)?, tz);
    if new_end < original.end_date {
        return Err(AppError::Validation(
            "The new end date must not shorten the leave".into(),
        ));
    }

    let emp = employee::find_by_id(pool, data.employee_ref)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", data.employee_ref)))?;

    let request = leave_request::create(
        pool,
        emp.id,
        &emp.full_name(),
        original.start_date,
        new_end,
        original.kind,
        Some(&data.reason),
        Some(original.id),
    )
    .await?;
    Ok(request)
}

/// Approve a pending request; the admin may have edited the end date.
///
/// Extension requests modify the original leave's end date in place;
/// plain requests create a new leave. Either way the side effect and the
/// status flip are one atomic commit.
pub async fn approve_request(
    pool: &SqlitePool,
    request_id: i64,
    end_date_override: Option<i64>,
) -> AppResult<(LeaveRequest, Leave)> {
    let mut tx = pool.begin().await?;

    let request = sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, employee_ref, employee_name, start_date, end_date, type, status, reason, \
         is_extension, original_leave_id, created_at FROM leave_request WHERE id = ?",
    )
    .bind(request_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Leave request {request_id} not found")))?;

    let end_date = end_date_override.unwrap_or(request.end_date);
    if end_date < request.start_date {
        return Err(AppError::Validation(
            "End date must not be before start date".into(),
        ));
    }

    let now = now_millis();
    let leave_id = match (request.is_extension, request.original_leave_id) {
        (true, Some(original_id)) => {
            let rows = sqlx::query(
                "UPDATE leave SET end_date = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND deleted = 0 AND start_date <= ?1",
            )
            .bind(end_date)
            .bind(now)
            .bind(original_id)
            .execute(&mut *tx)
            .await?;
            if rows.rows_affected() == 0 {
                return Err(AppError::NotFound(format!(
                    "Original leave {original_id} no longer exists"
                )));
            }
            original_id
        }
        _ => {
            let id = snowflake_id();
            sqlx::query(
                "INSERT INTO leave (id, employee_ref, start_date, end_date, type, deleted, \
                 updated_at) VALUES (?, ?, ?, ?, ?, 0, ?)",
            )
            .bind(id)
            .bind(request.employee_ref)
            .bind(request.start_date)
            .bind(end_date)
            .bind(request.kind)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            id
        }
    };

    // One-shot transition: a concurrent decision loses here
    let rows = sqlx::query(
        "UPDATE leave_request SET status = 'approved' WHERE id = ? AND status = 'pending'",
    )
    .bind(request_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "Leave request {request_id} is not pending"
        )));
    }

    let leave = sqlx::query_as::<_, Leave>(
        "SELECT id, employee_ref, start_date, end_date, type, deleted, updated_at \
         FROM leave WHERE id = ?",
    )
    .bind(leave_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let mut approved = request;
    approved.status = shared::models::LeaveRequestStatus::Approved;
    approved.end_date = end_date;
    Ok((approved, leave))
}

/// Deny a pending request (terminal, no side effects)
pub async fn deny_request(pool: &SqlitePool, request_id: i64) -> AppResult<LeaveRequest> {
    Ok(leave_request::deny(pool, request_id).await?)
}

/// Annual accounting plus current leave and history for one employee
///
/// Vacation leaves whose start date falls in the current year count
/// toward the allowance; `days_remaining` may go negative and is floored
/// only at display time.
pub async fn summary_for(pool: &SqlitePool, tz: Tz, employee_ref: i64) -> AppResult<LeaveSummary> {
    let config = settings::get_or_create(pool).await?;

    let current_date = today(tz);
    let year = current_date.year();
    let year_start = day_start_millis(
        chrono::NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(current_date),
        tz,
    );
    let year_end = day_start_millis(
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(current_date),
        tz,
    );

    let vacations =
        leave::find_vacation_in_year(pool, employee_ref, year_start, year_end).await?;
    let days_taken: i64 = vacations
        .iter()
        .map(|l| duration_days(l.start_date, l.end_date, tz))
        .sum();

    let today_millis = day_start_millis(current_date, tz);
    let current_leave = leave::find_current(pool, employee_ref, today_millis).await?;
    let history = leave::find_by_employee(pool, employee_ref).await?;

    Ok(LeaveSummary {
        year,
        days_taken,
        days_remaining: config.annual_leave_days - days_taken,
        current_leave,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use chrono_tz::UTC;

    use crate::utils::time::date_hms_to_millis;

    fn day(d: u32) -> i64 {
        date_hms_to_millis(
            chrono::NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
            NaiveTime::MIN,
            UTC,
        )
    }

    #[test]
    fn single_day_leave_is_one_day() {
        assert_eq!(duration_days(day(5), day(5), UTC), 1);
    }

    #[test]
    fn inclusive_day_count() {
        assert_eq!(duration_days(day(5), day(9), UTC), 5);
    }

    #[test]
    fn duration_ignores_time_of_day() {
        let start = day(5);
        let end = day(7) + 23 * 3_600_000; // late in the evening
        assert_eq!(duration_days(start, end, UTC), 3);
    }
}
