//! Report Handlers
//!
//! Date-ranged aggregation queries. Dates arrive as `YYYY-MM-DD` and are
//! converted to site-timezone day bounds here; the aggregation itself is
//! pure and lives in the attendance engine.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::models::{LateArrivalRow, OnLeaveRow, PayrollRow};

use crate::attendance::engine;
use crate::core::ServerState;
use crate::db::repository::{attendance, employee, leave, settings};
use crate::leave as leave_engine;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, parse_hhmm};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: String,
    pub end_date: String,
}

impl RangeQuery {
    /// Inclusive day range -> `[start, end)` millis in the site timezone
    fn bounds(&self, state: &ServerState) -> AppResult<(i64, i64)> {
        let tz = state.config.timezone;
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if end < start {
            return Err(AppError::Validation(
                "end_date must not be before start_date".into(),
            ));
        }
        Ok((day_start_millis(start, tz), day_end_millis(end, tz)))
    }
}

/// GET /api/reports/payroll - 工时与加班汇总
pub async fn payroll(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<PayrollRow>>> {
    let (start, end) = query.bounds(&state)?;
    let config = settings::get_or_create(&state.pool).await?;
    let shift_start = parse_hhmm(&config.shift_start)?;
    let shift_end = parse_hhmm(&config.shift_end)?;

    let logs = attendance::find_in_range(&state.pool, start, end).await?;
    let rows = engine::aggregate_payroll(
        &logs,
        shift_start,
        shift_end,
        config.daily_rate,
        config.overtime_rate,
        state.config.timezone,
    );
    Ok(Json(rows))
}

/// GET /api/reports/late-arrivals - 迟到清单
pub async fn late_arrivals(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<LateArrivalRow>>> {
    let (start, end) = query.bounds(&state)?;
    let config = settings::get_or_create(&state.pool).await?;
    let shift_start = parse_hhmm(&config.shift_start)?;

    let logs = attendance::find_in_range(&state.pool, start, end).await?;
    let rows = engine::late_arrivals(&logs, shift_start, state.config.timezone);
    Ok(Json(rows))
}

/// GET /api/reports/on-leave - 区间内休假清单
pub async fn on_leave(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<OnLeaveRow>>> {
    let tz = state.config.timezone;
    let (start, end) = query.bounds(&state)?;
    // Overlap test is end-inclusive on day bounds
    let leaves = leave::find_overlapping(&state.pool, start, end - 1).await?;

    let roster: HashMap<i64, (String, Option<String>)> = employee::find_all(&state.pool)
        .await?
        .into_iter()
        .map(|e| (e.id, (e.full_name(), e.department)))
        .collect();

    let rows = leaves
        .into_iter()
        .map(|l| {
            let (employee_name, department) = roster
                .get(&l.employee_ref)
                .cloned()
                .unwrap_or_else(|| ("Unknown".to_string(), None));
            OnLeaveRow {
                employee_ref: l.employee_ref,
                employee_name,
                department,
                kind: l.kind,
                start_date: l.start_date,
                end_date: l.end_date,
                duration_days: leave_engine::duration_days(l.start_date, l.end_date, tz),
            }
        })
        .collect();

    Ok(Json(rows))
}
