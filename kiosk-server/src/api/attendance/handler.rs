//! Attendance API Handlers
//!
//! Read-side views over the append-only log. Writes happen only through
//! the kiosk verification flow and the reconciliation job.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{AttendanceLog, AttendancePair, DutyStatus, EmployeeView, ShiftSnapshot};
use shared::util::now_millis;

use crate::attendance::{pairing, shift};
use crate::core::ServerState;
use crate::db::repository::{attendance, employee, settings};
use crate::utils::AppResult;
use crate::utils::time::parse_hhmm;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/attendance/recent - 实时进出流水
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AttendanceLog>>> {
    let logs = attendance::find_recent(&state.pool, query.limit.clamp(1, 500)).await?;
    Ok(Json(logs))
}

/// On-duty row with the live shift snapshot for the dashboard
#[derive(Debug, Serialize)]
pub struct OnDutyRow {
    pub employee: EmployeeView,
    pub shift: Option<ShiftSnapshot>,
}

/// GET /api/attendance/on-duty - 当前在岗员工与班次进度
pub async fn on_duty(State(state): State<ServerState>) -> AppResult<Json<Vec<OnDutyRow>>> {
    let config = settings::get_or_create(&state.pool).await?;
    let tz = state.config.timezone;
    let shift_times = (
        parse_hhmm(&config.shift_start).ok(),
        parse_hhmm(&config.shift_end).ok(),
    );

    let now = now_millis();
    let rows = employee::find_all(&state.pool)
        .await?
        .iter()
        .filter(|e| e.status == DutyStatus::LoggedIn)
        .map(|e| {
            let snapshot = match (e.last_login_time, shift_times) {
                (Some(login), (Some(start), Some(end))) => {
                    let window = shift::shift_window(login, start, end, tz);
                    Some(shift::snapshot(login, now, &window))
                }
                _ => None,
            };
            OnDutyRow {
                employee: EmployeeView::from(e),
                shift: snapshot,
            }
        })
        .collect();

    Ok(Json(rows))
}

/// GET /api/attendance/employees/{id}/logs - 单个员工的全部流水
pub async fn employee_logs(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceLog>>> {
    let logs = attendance::find_by_employee(&state.pool, id).await?;
    Ok(Json(logs))
}

/// GET /api/attendance/employees/{id}/pairs - 配对后的班次历史 (最近在前)
pub async fn employee_pairs(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<AttendancePair>>> {
    let logs = attendance::find_by_employee(&state.pool, id).await?;
    Ok(Json(pairing::pair_logs(&logs)))
}
