//! Admin Account Repository (Singleton)
//!
//! One administrator account guards the dashboard API. The password hash
//! is argon2; seeding happens at startup from the environment.

use sqlx::SqlitePool;

use shared::util::now_millis;

use super::{RepoError, RepoResult};

const SINGLETON_ID: i64 = 1;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminAccount {
    pub id: i64,
    pub username: String,
    pub hash_pass: String,
    pub created_at: i64,
    pub updated_at: i64,
}

pub async fn get(pool: &SqlitePool) -> RepoResult<Option<AdminAccount>> {
    let account = sqlx::query_as::<_, AdminAccount>(
        "SELECT id, username, hash_pass, created_at, updated_at FROM admin_account WHERE id = ?",
    )
    .bind(SINGLETON_ID)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Create the account if missing; existing credentials are never overwritten
pub async fn seed(pool: &SqlitePool, username: &str, hash_pass: &str) -> RepoResult<AdminAccount> {
    if let Some(existing) = get(pool).await? {
        return Ok(existing);
    }

    let now = now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO admin_account (id, username, hash_pass, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(SINGLETON_ID)
    .bind(username)
    .bind(hash_pass)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to seed admin account".into()))
}

pub async fn update_password(pool: &SqlitePool, hash_pass: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE admin_account SET hash_pass = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(hash_pass)
        .bind(now_millis())
        .bind(SINGLETON_ID)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Admin account not found".into()));
    }
    Ok(())
}
