//! Settings Repository (Singleton)

use sqlx::SqlitePool;

use shared::models::{Settings, SettingsUpdate};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

const SINGLETON_ID: i64 = 1;

const COLUMNS: &str =
    "id, shift_start, shift_end, daily_rate, overtime_rate, annual_leave_days, updated_at";

pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<Settings> {
    if let Some(settings) = get(pool).await? {
        return Ok(settings);
    }

    // Defaults from the schema; insert just the key
    sqlx::query("INSERT OR IGNORE INTO settings (id, updated_at) VALUES (?, ?)")
        .bind(SINGLETON_ID)
        .bind(now_millis())
        .execute(pool)
        .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create settings".into()))
}

pub async fn get(pool: &SqlitePool) -> RepoResult<Option<Settings>> {
    let settings =
        sqlx::query_as::<_, Settings>(&format!("SELECT {COLUMNS} FROM settings WHERE id = ?"))
            .bind(SINGLETON_ID)
            .fetch_optional(pool)
            .await?;
    Ok(settings)
}

pub async fn update(pool: &SqlitePool, data: SettingsUpdate) -> RepoResult<Settings> {
    // Ensure the row exists before the partial update
    get_or_create(pool).await?;

    sqlx::query(
        "UPDATE settings SET \
            shift_start = COALESCE(?1, shift_start), \
            shift_end = COALESCE(?2, shift_end), \
            daily_rate = COALESCE(?3, daily_rate), \
            overtime_rate = COALESCE(?4, overtime_rate), \
            annual_leave_days = COALESCE(?5, annual_leave_days), \
            updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(&data.shift_start)
    .bind(&data.shift_end)
    .bind(data.daily_rate)
    .bind(data.overtime_rate)
    .bind(data.annual_leave_days)
    .bind(now_millis())
    .bind(SINGLETON_ID)
    .execute(pool)
    .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read settings after update".into()))
}
