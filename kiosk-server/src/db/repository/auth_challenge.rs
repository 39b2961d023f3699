//! Platform Credential Challenge Repository
//!
//! Single-use challenges for the WebAuthn-style flows. A challenge is
//! deleted the moment it is consumed, so a replayed completion cannot
//! resolve to an identity.

use sqlx::SqlitePool;

use shared::util::now_millis;

use super::RepoResult;

/// Challenge lifetime; the kiosk prompt times out well before this
pub const CHALLENGE_TTL_MILLIS: i64 = 120_000;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChallengeRow {
    pub id: String,
    pub challenge: String,
    pub purpose: String,
    pub employee_ref: Option<i64>,
    pub issued_at: i64,
}

pub async fn create(
    pool: &SqlitePool,
    id: &str,
    challenge: &str,
    purpose: &str,
    employee_ref: Option<i64>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO auth_challenge (id, challenge, purpose, employee_ref, issued_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(challenge)
    .bind(purpose)
    .bind(employee_ref)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

/// Consume a challenge: fetch and delete in one transaction.
///
/// Returns None when the id is unknown (already consumed or never issued).
/// Freshness is the caller's check; expired rows are still consumed so
/// they cannot be retried.
pub async fn take(pool: &SqlitePool, id: &str) -> RepoResult<Option<ChallengeRow>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ChallengeRow>(
        "SELECT id, challenge, purpose, employee_ref, issued_at FROM auth_challenge WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    if row.is_some() {
        sqlx::query("DELETE FROM auth_challenge WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(row)
}

/// Drop challenges past their TTL (periodic housekeeping)
pub async fn prune_expired(pool: &SqlitePool) -> RepoResult<u64> {
    let cutoff = now_millis() - CHALLENGE_TTL_MILLIS;
    let rows = sqlx::query("DELETE FROM auth_challenge WHERE issued_at < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
