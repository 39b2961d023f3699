//! Leave Repository
//!
//! Soft-delete model: `delete` flags, `restore` clears, `purge` removes.
//! Day-granular bounds; `start_date`/`end_date` are local-midnight millis.

use sqlx::SqlitePool;

use shared::models::{Leave, LeaveType};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, employee_ref, start_date, end_date, type, deleted, updated_at";

/// Find leave by id (deleted or not)
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Leave>> {
    let leave = sqlx::query_as::<_, Leave>(&format!("SELECT {COLUMNS} FROM leave WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(leave)
}

/// All non-deleted leaves, newest first
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave WHERE deleted = 0 ORDER BY start_date DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Non-deleted leaves for one employee, newest first
pub async fn find_by_employee(pool: &SqlitePool, employee_ref: i64) -> RepoResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave WHERE employee_ref = ? AND deleted = 0 \
         ORDER BY start_date DESC"
    ))
    .bind(employee_ref)
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Soft-deleted set (the recycle bin), most recently deleted first
pub async fn find_deleted(pool: &SqlitePool) -> RepoResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave WHERE deleted = 1 ORDER BY updated_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Non-deleted leave covering the given instant's day for an employee
///
/// End-inclusive: `day_millis` must be within `[start_date, end_date]`
/// where both bounds are local midnights, so pass the *start* of today.
pub async fn find_current(
    pool: &SqlitePool,
    employee_ref: i64,
    day_millis: i64,
) -> RepoResult<Option<Leave>> {
    let leave = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave \
         WHERE employee_ref = ? AND deleted = 0 AND start_date <= ? AND end_date >= ? \
         ORDER BY start_date DESC LIMIT 1"
    ))
    .bind(employee_ref)
    .bind(day_millis)
    .bind(day_millis)
    .fetch_optional(pool)
    .await?;
    Ok(leave)
}

/// Non-deleted leaves intersecting the inclusive day range
pub async fn find_overlapping(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave \
         WHERE deleted = 0 AND start_date <= ? AND end_date >= ? ORDER BY start_date DESC"
    ))
    .bind(end_millis)
    .bind(start_millis)
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Non-deleted Vacation leaves starting inside `[year_start, year_end)`
///
/// Annual accounting input; the year bounds are local millis.
pub async fn find_vacation_in_year(
    pool: &SqlitePool,
    employee_ref: i64,
    year_start_millis: i64,
    year_end_millis: i64,
) -> RepoResult<Vec<Leave>> {
    let leaves = sqlx::query_as::<_, Leave>(&format!(
        "SELECT {COLUMNS} FROM leave \
         WHERE employee_ref = ? AND deleted = 0 AND type = 'Vacation' \
           AND start_date >= ? AND start_date < ?"
    ))
    .bind(employee_ref)
    .bind(year_start_millis)
    .bind(year_end_millis)
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}

/// Create a leave directly (admin entry or request approval)
pub async fn create(
    pool: &SqlitePool,
    employee_ref: i64,
    start_date: i64,
    end_date: i64,
    kind: LeaveType,
) -> RepoResult<Leave> {
    if end_date < start_date {
        return Err(RepoError::Validation(
            "End date must not be before start date".into(),
        ));
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO leave (id, employee_ref, start_date, end_date, type, deleted, updated_at) \
         VALUES (?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(employee_ref)
    .bind(start_date)
    .bind(end_date)
    .bind(kind)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave".into()))
}

/// Extend an existing leave's end date in place
pub async fn extend(pool: &SqlitePool, id: i64, new_end_date: i64) -> RepoResult<Leave> {
    let rows = sqlx::query(
        "UPDATE leave SET end_date = ?1, updated_at = ?2 \
         WHERE id = ?3 AND deleted = 0 AND start_date <= ?1",
    )
    .bind(new_end_date)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Leave {id} not found, deleted, or end date before its start"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Leave {id} not found")))
}

/// Soft delete: flag the row, keep it queryable through the recycle bin
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE leave SET deleted = 1, updated_at = ?1 WHERE id = ?2 AND deleted = 0")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Leave {id} not found or already in the recycle bin"
        )));
    }
    Ok(())
}

/// Restore a batch of soft-deleted leaves in one statement
pub async fn restore(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE leave SET deleted = 0, updated_at = ? WHERE deleted = 1 AND id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql).bind(now_millis());
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Hard delete exactly the given recycle-bin rows
pub async fn purge(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("DELETE FROM leave WHERE deleted = 1 AND id IN ({placeholders})");
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Hard delete every currently soft-deleted row
///
/// The deleted-set is evaluated at execution time inside the statement,
/// so records restored between the purge request and its execution
/// survive (the restore cleared their flag first).
pub async fn purge_all(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM leave WHERE deleted = 1")
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
