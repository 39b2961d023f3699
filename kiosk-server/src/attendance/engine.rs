//! Attendance toggle engine and report aggregation
//!
//! The toggle flips duty status and appends the matching log entry in one
//! transaction. The employee's *persisted* status is re-read inside that
//! transaction and the flip is guarded on it, so a kiosk retry after a
//! network blip cannot double-flip: the second attempt sees zero affected
//! rows and surfaces a conflict.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::client::ToggleReceipt;
use shared::models::{
    AttendanceLog, DutyStatus, Employee, LateArrivalRow, LogType, NotificationKind, PayrollRow,
    Settings,
};
use shared::util::{now_millis, snowflake_id};

use crate::db::repository::settings;
use crate::utils::time::{date_hms_to_millis, local_date_of, parse_hhmm};
use crate::utils::{AppError, AppResult};

use super::shift::{self, ShiftWindow};

/// Result of one toggle
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    /// Employee row after the flip
    pub employee: Employee,
    pub receipt: ToggleReceipt,
    /// Out landed strictly before the login's shift end
    pub early_clock_out: bool,
}

fn parse_shift_times(s: &Settings) -> Option<(NaiveTime, NaiveTime)> {
    match (parse_hhmm(&s.shift_start), parse_hhmm(&s.shift_end)) {
        (Ok(start), Ok(end)) => Some((start, end)),
        _ => {
            tracing::warn!(
                shift_start = %s.shift_start,
                shift_end = %s.shift_end,
                "Unparseable shift times in settings; skipping shift math"
            );
            None
        }
    }
}

/// Flip duty status and append the log entry atomically
pub async fn toggle(pool: &SqlitePool, tz: Tz, employee_id: i64) -> AppResult<ToggleOutcome> {
    let config = settings::get_or_create(pool).await?;
    let shift_times = parse_shift_times(&config);

    let mut tx = pool.begin().await?;

    // Source of truth: the persisted row, read inside the transaction
    let emp = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_id, first_name, surname, position, department, status, \
         last_login_time, pin, face_descriptor, credential_id, public_key, created_at, \
         updated_at FROM employee WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {employee_id} not found")))?;

    let now = now_millis();
    let (next_status, log_type) = match emp.status {
        DutyStatus::LoggedOut => (DutyStatus::LoggedIn, LogType::In),
        DutyStatus::LoggedIn => (DutyStatus::LoggedOut, LogType::Out),
    };

    // Guarded flip: `last_login_time` is set on the way in and left
    // untouched on the way out (next login's shift math reads it)
    let rows = sqlx::query(
        "UPDATE employee SET status = ?1, \
            last_login_time = CASE WHEN ?2 THEN ?3 ELSE last_login_time END, \
            updated_at = ?3 \
         WHERE id = ?4 AND status = ?5",
    )
    .bind(next_status)
    .bind(log_type == LogType::In)
    .bind(now)
    .bind(employee_id)
    .bind(emp.status)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(AppError::Conflict(
            "Attendance was updated concurrently, please retry".to_string(),
        ));
    }

    let log = AttendanceLog {
        id: snowflake_id(),
        employee_ref: emp.id,
        timestamp: now,
        kind: log_type,
        employee_name: emp.full_name(),
        employee_position: emp.position.clone(),
        notes: None,
    };
    sqlx::query(
        "INSERT INTO attendance_log (id, employee_ref, timestamp, type, employee_name, \
         employee_position, notes) VALUES (?, ?, ?, ?, ?, ?, NULL)",
    )
    .bind(log.id)
    .bind(log.employee_ref)
    .bind(log.timestamp)
    .bind(log.kind)
    .bind(&log.employee_name)
    .bind(&log.employee_position)
    .execute(&mut *tx)
    .await?;

    // Window of the login this event belongs to
    let window: Option<ShiftWindow> = shift_times.map(|(start, end)| {
        let anchor = match log_type {
            LogType::In => now,
            LogType::Out => emp.last_login_time.unwrap_or(now),
        };
        shift::shift_window(anchor, start, end, tz)
    });

    let early_clock_out = log_type == LogType::Out
        && window.map_or(false, |w| now < w.end_millis);

    if early_clock_out {
        sqlx::query(
            "INSERT INTO notification (id, employee_ref, employee_name, timestamp, kind, \
             message, read) VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(snowflake_id())
        .bind(emp.id)
        .bind(log.employee_name.clone())
        .bind(now)
        .bind(NotificationKind::EarlyClockOut)
        .bind("clocked out before the end of the shift.")
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let shift_snapshot = match log_type {
        LogType::In => window.map(|w| shift::snapshot(now, now, &w)),
        LogType::Out => None,
    };

    let mut employee = emp;
    employee.status = next_status;
    if log_type == LogType::In {
        employee.last_login_time = Some(now);
    }
    employee.updated_at = now;

    Ok(ToggleOutcome {
        employee,
        receipt: ToggleReceipt {
            log,
            shift: shift_snapshot,
        },
        early_clock_out,
    })
}

// ── Report aggregation ──────────────────────────────────────────────

/// Daily work sessions: first `in` and last `out` per calendar day
fn daily_sessions(logs: &[AttendanceLog], tz: Tz) -> BTreeMap<String, (Option<i64>, Option<i64>)> {
    let mut days: BTreeMap<String, (Option<i64>, Option<i64>)> = BTreeMap::new();
    for log in logs {
        let day = local_date_of(log.timestamp, tz).to_string();
        let entry = days.entry(day).or_default();
        match log.kind {
            LogType::In => {
                if entry.0.is_none() {
                    entry.0 = Some(log.timestamp);
                }
            }
            LogType::Out => entry.1 = Some(log.timestamp),
        }
    }
    days
}

/// Aggregate payroll figures over a log window (pure; report query glue
/// fetches the logs). Employees with no completed day are omitted.
pub fn aggregate_payroll(
    logs: &[AttendanceLog],
    shift_start: NaiveTime,
    shift_end: NaiveTime,
    daily_rate: f64,
    overtime_rate: f64,
    tz: Tz,
) -> Vec<PayrollRow> {
    let mut by_employee: BTreeMap<i64, Vec<&AttendanceLog>> = BTreeMap::new();
    for log in logs {
        by_employee.entry(log.employee_ref).or_default().push(log);
    }

    let mut rows = Vec::new();
    for (employee_ref, emp_logs) in by_employee {
        let owned: Vec<AttendanceLog> = emp_logs.iter().map(|l| (*l).clone()).collect();
        let mut days_worked = 0i64;
        let mut overtime_ms = 0i64;

        for (_, (clock_in, clock_out)) in daily_sessions(&owned, tz) {
            if let (Some(in_ts), Some(out_ts)) = (clock_in, clock_out) {
                days_worked += 1;
                // Overtime against this login's own shift end
                let window = shift::shift_window(in_ts, shift_start, shift_end, tz);
                overtime_ms += shift::overtime_millis(out_ts, &window);
            }
        }

        if days_worked == 0 {
            continue;
        }

        let overtime_hours = overtime_ms as f64 / 3_600_000.0;
        let base_pay = days_worked as f64 * daily_rate;
        let overtime_pay = overtime_hours * overtime_rate;
        rows.push(PayrollRow {
            employee_ref,
            employee_name: owned
                .last()
                .map(|l| l.employee_name.clone())
                .unwrap_or_default(),
            days_worked,
            overtime_hours,
            base_pay,
            overtime_pay,
            gross_pay: base_pay + overtime_pay,
        });
    }

    rows.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));
    rows
}

/// Clock-ins after the configured shift start, with minutes late
pub fn late_arrivals(logs: &[AttendanceLog], shift_start: NaiveTime, tz: Tz) -> Vec<LateArrivalRow> {
    let mut rows = Vec::new();
    for log in logs {
        if log.kind != LogType::In {
            continue;
        }
        let day = local_date_of(log.timestamp, tz);
        let start = date_hms_to_millis(day, shift_start, tz);
        if log.timestamp > start {
            rows.push(LateArrivalRow {
                employee_ref: log.employee_ref,
                employee_name: log.employee_name.clone(),
                clock_in: log.timestamp,
                // Round up so a 30-second delay still reads as late
                minutes_late: (log.timestamp - start + 59_999) / 60_000,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::UTC;

    fn at(d: u32, hh: u32, mm: u32) -> i64 {
        date_hms_to_millis(
            NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
            UTC,
        )
    }

    fn log(employee_ref: i64, timestamp: i64, kind: LogType) -> AttendanceLog {
        AttendanceLog {
            id: timestamp,
            employee_ref,
            timestamp,
            kind,
            employee_name: format!("Employee {employee_ref}"),
            employee_position: "Miner".into(),
            notes: None,
        }
    }

    #[test]
    fn payroll_counts_completed_days_and_overtime() {
        let shift_start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        let shift_end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        let logs = vec![
            // Day 1: out exactly at shift end, no overtime
            log(1, at(10, 7, 30), LogType::In),
            log(1, at(10, 18, 0), LogType::Out),
            // Day 2: out 90 minutes past shift end
            log(1, at(11, 8, 0), LogType::In),
            log(1, at(11, 19, 30), LogType::Out),
            // Day 3: open shift, not counted
            log(1, at(12, 8, 0), LogType::In),
        ];

        let rows = aggregate_payroll(&logs, shift_start, shift_end, 10.0, 20.0, UTC);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.days_worked, 2);
        assert!((row.overtime_hours - 1.5).abs() < 1e-9);
        assert!((row.base_pay - 20.0).abs() < 1e-9);
        assert!((row.overtime_pay - 30.0).abs() < 1e-9);
        assert!((row.gross_pay - 50.0).abs() < 1e-9);
    }

    #[test]
    fn payroll_omits_employees_without_completed_days() {
        let shift_start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        let shift_end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let logs = vec![log(7, at(10, 8, 0), LogType::In)];
        assert!(aggregate_payroll(&logs, shift_start, shift_end, 10.0, 20.0, UTC).is_empty());
    }

    #[test]
    fn late_arrivals_round_up_and_skip_punctual() {
        let shift_start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        let logs = vec![
            log(1, at(10, 7, 30), LogType::In), // punctual
            log(2, at(10, 7, 31), LogType::In), // 1 minute late
            log(3, at(10, 9, 0), LogType::Out), // outs ignored
        ];
        let rows = late_arrivals(&logs, shift_start, UTC);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_ref, 2);
        assert_eq!(rows[0].minutes_late, 1);
    }
}
