//! Notification Repository

use sqlx::SqlitePool;

use shared::models::{Notification, NotificationKind};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, employee_ref, employee_name, timestamp, kind, message, read";

/// Emit a system-authored alert
pub async fn create(
    pool: &SqlitePool,
    employee_ref: Option<i64>,
    employee_name: &str,
    kind: NotificationKind,
    message: &str,
) -> RepoResult<Notification> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, employee_ref, employee_name, timestamp, kind, message, read) \
         VALUES (?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(id)
    .bind(employee_ref)
    .bind(employee_name)
    .bind(now_millis())
    .bind(kind)
    .bind(message)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let notification = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(notification)
}

/// Recent notifications, newest first; unread ones on top
pub async fn find_recent(pool: &SqlitePool, limit: i32) -> RepoResult<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification ORDER BY read, timestamp DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(notifications)
}

pub async fn count_unread(pool: &SqlitePool) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notification WHERE read = 0")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn mark_read(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE notification SET read = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Notification {id} not found")));
    }
    Ok(())
}

pub async fn mark_all_read(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET read = 1 WHERE read = 0")
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
