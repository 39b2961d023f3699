//! Attendance Log Repository
//!
//! Append-only: rows are written by the toggle engine and the
//! reconciliation job, never mutated or deleted.

use sqlx::SqlitePool;

use shared::models::AttendanceLog;

use super::RepoResult;

const COLUMNS: &str =
    "id, employee_ref, timestamp, type, employee_name, employee_position, notes";

/// All logs for one employee, ascending by time (pairing order)
pub async fn find_by_employee(pool: &SqlitePool, employee_ref: i64) -> RepoResult<Vec<AttendanceLog>> {
    let logs = sqlx::query_as::<_, AttendanceLog>(&format!(
        "SELECT {COLUMNS} FROM attendance_log WHERE employee_ref = ? ORDER BY timestamp"
    ))
    .bind(employee_ref)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

/// Logs in a closed-open interval `[start, end)`, ascending
pub async fn find_in_range(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<AttendanceLog>> {
    let logs = sqlx::query_as::<_, AttendanceLog>(&format!(
        "SELECT {COLUMNS} FROM attendance_log WHERE timestamp >= ? AND timestamp < ? \
         ORDER BY timestamp"
    ))
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

/// Most recent events for the live feed
pub async fn find_recent(pool: &SqlitePool, limit: i32) -> RepoResult<Vec<AttendanceLog>> {
    let logs = sqlx::query_as::<_, AttendanceLog>(&format!(
        "SELECT {COLUMNS} FROM attendance_log ORDER BY timestamp DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

