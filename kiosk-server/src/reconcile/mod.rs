//! Daily Reconciliation Job
//!
//! Repairs employees who never clocked out: anyone still `LOGGED_IN`
//! whose last login was before today's local midnight is force-closed
//! with a synthetic `out` at 23:59:59.999 on the login day, plus a
//! missed-logout notification.
//!
//! Idempotency is a compare-and-set on the `system_state` singleton
//! (`last_reconcile_date`), committed in the same transaction as the
//! repairs: a failed batch leaves the guard unset and the next invocation
//! retries the whole run. The guard is a store row, not process memory,
//! so the at-most-once-per-day property survives restarts.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::models::{DutyStatus, Employee, LogType, NotificationKind};
use shared::util::{now_millis, snowflake_id};

use crate::core::ServerState;
use crate::db::repository::{notification, system_state};
use crate::utils::time::{day_start_millis, end_of_day_millis, local_date_of, today, today_string};
use crate::utils::AppResult;

const AUTO_CLOCK_OUT_NOTE: &str = "auto clock-out";
const MISSED_LOGOUT_MESSAGE: &str =
    "was automatically clocked out for yesterday due to a missed logout.";
const DAILY_REPORT_MESSAGE: &str = "Yesterday's attendance report is ready to print.";

/// What a run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Guard already carries today's date
    Skipped,
    Completed {
        repaired: usize,
    },
}

/// Run the daily tasks against the store (no broadcasting)
pub async fn run_daily_tasks(pool: &SqlitePool, tz: Tz) -> AppResult<RunOutcome> {
    let today_str = today_string(tz);

    if system_state::reconcile_done_for(pool, &today_str).await? {
        return Ok(RunOutcome::Skipped);
    }

    tracing::info!(date = %today_str, "Running daily reconciliation");

    let repair_result = repair_missed_logouts(pool, tz, &today_str).await;

    // Emitted independent of the repair outcome; a failed batch keeps the
    // guard unset, so a retry may emit a second report notice — accepted.
    if let Err(e) =
        notification::create(pool, None, "System", NotificationKind::DailyReportReady, DAILY_REPORT_MESSAGE)
            .await
    {
        tracing::error!(error = %e, "Failed to emit daily-report notification");
    }

    let repaired = repair_result?;
    tracing::info!(repaired, "Daily reconciliation completed");
    Ok(RunOutcome::Completed { repaired })
}

/// Force-close stale logins and set the guard, all in one transaction
async fn repair_missed_logouts(pool: &SqlitePool, tz: Tz, today_str: &str) -> AppResult<usize> {
    let today_start = day_start_millis(today(tz), tz);

    let mut tx = pool.begin().await?;

    let stale = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_id, first_name, surname, position, department, status, \
         last_login_time, pin, face_descriptor, credential_id, public_key, created_at, \
         updated_at FROM employee \
         WHERE status = 'LOGGED_IN' AND last_login_time IS NOT NULL AND last_login_time < ?",
    )
    .bind(today_start)
    .fetch_all(&mut *tx)
    .await?;

    let now = now_millis();
    for emp in &stale {
        sqlx::query(
            "UPDATE employee SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        )
        .bind(DutyStatus::LoggedOut)
        .bind(now)
        .bind(emp.id)
        .bind(DutyStatus::LoggedIn)
        .execute(&mut *tx)
        .await?;

        // Synthetic out at the last millisecond of the login's own day
        let login_day = local_date_of(emp.last_login_time.unwrap_or(now), tz);
        let synthetic_out = end_of_day_millis(login_day, tz);

        sqlx::query(
            "INSERT INTO attendance_log (id, employee_ref, timestamp, type, employee_name, \
             employee_position, notes) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(emp.id)
        .bind(synthetic_out)
        .bind(LogType::Out)
        .bind(emp.full_name())
        .bind(&emp.position)
        .bind(AUTO_CLOCK_OUT_NOTE)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO notification (id, employee_ref, employee_name, timestamp, kind, \
             message, read) VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(snowflake_id())
        .bind(emp.id)
        .bind(emp.full_name())
        .bind(now)
        .bind(NotificationKind::MissedLogout)
        .bind(MISSED_LOGOUT_MESSAGE)
        .execute(&mut *tx)
        .await?;
    }

    // Compare-and-set guard: only one run per calendar day can commit this
    let rows = sqlx::query(
        "UPDATE system_state SET last_reconcile_date = ?1, updated_at = ?2 \
         WHERE id = 1 AND (last_reconcile_date IS NULL OR last_reconcile_date <> ?1)",
    )
    .bind(today_str)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        // A concurrent run won the day; drop our repairs
        tx.rollback().await?;
        return Ok(0);
    }

    tx.commit().await?;

    if !stale.is_empty() {
        tracing::info!(count = stale.len(), "Automatically logged out stale employees");
    }
    Ok(stale.len())
}

/// Run and broadcast; the background-task entry point
pub async fn run(state: &ServerState) -> AppResult<RunOutcome> {
    let outcome = run_daily_tasks(&state.pool, state.config.timezone).await?;

    if let RunOutcome::Completed { repaired } = outcome {
        if repaired > 0 {
            state
                .broadcast_sync::<()>("employee", "reconciled", "all", None)
                .await;
        }
        state
            .broadcast_sync::<()>("notification", "created", "all", None)
            .await;
    }

    Ok(outcome)
}
