//! Settings Handlers

use axum::{Json, extract::State};

use shared::models::{Settings, SettingsUpdate};

use crate::core::ServerState;
use crate::db::repository::settings;
use crate::utils::time::parse_hhmm;
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "settings";

/// GET /api/settings - 站点配置
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    let config = settings::get_or_create(&state.pool).await?;
    Ok(Json(config))
}

fn validate_rate(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// PUT /api/settings - 更新站点配置
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    // 班次时刻必须是合法 HH:mm；结束早于开始表示跨午夜班次，合法
    if let Some(ref shift_start) = payload.shift_start {
        parse_hhmm(shift_start)?;
    }
    if let Some(ref shift_end) = payload.shift_end {
        parse_hhmm(shift_end)?;
    }
    if let Some(rate) = payload.daily_rate {
        validate_rate(rate, "daily_rate")?;
    }
    if let Some(rate) = payload.overtime_rate {
        validate_rate(rate, "overtime_rate")?;
    }
    if let Some(days) = payload.annual_leave_days
        && days < 0
    {
        return Err(AppError::Validation(
            "annual_leave_days must not be negative".into(),
        ));
    }

    let updated = settings::update(&state.pool, payload).await?;

    state
        .broadcast_sync(RESOURCE, "updated", "1", Some(&updated))
        .await;

    Ok(Json(updated))
}
