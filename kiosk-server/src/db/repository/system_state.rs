//! System State Repository (Singleton)
//!
//! Holds the reconciliation idempotency guard. The guard write is a
//! compare-and-set so "at most one completed reconciliation per calendar
//! day" survives process restarts and concurrent invocations.

use sqlx::SqlitePool;

use shared::models::SystemState;
use shared::util::now_millis;

use super::{RepoError, RepoResult};

const SINGLETON_ID: i64 = 1;

pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<SystemState> {
    if let Some(state) = get(pool).await? {
        return Ok(state);
    }

    let now = now_millis();
    sqlx::query("INSERT OR IGNORE INTO system_state (id, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(SINGLETON_ID)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create system state".into()))
}

pub async fn get(pool: &SqlitePool) -> RepoResult<Option<SystemState>> {
    let state = sqlx::query_as::<_, SystemState>(
        "SELECT id, last_reconcile_date, created_at, updated_at FROM system_state WHERE id = ?",
    )
    .bind(SINGLETON_ID)
    .fetch_optional(pool)
    .await?;
    Ok(state)
}

/// True if the reconciliation guard already carries the given date
pub async fn reconcile_done_for(pool: &SqlitePool, date: &str) -> RepoResult<bool> {
    let state = get_or_create(pool).await?;
    Ok(state.last_reconcile_date.as_deref() == Some(date))
}
