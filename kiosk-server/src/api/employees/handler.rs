//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::client::{
    EnrollCredentialBeginResponse, EnrollCredentialCompleteRequest, EnrollFaceRequest,
};
use shared::models::{EmployeeCreate, EmployeeUpdate, EmployeeView};

use crate::core::ServerState;
use crate::db::repository::employee;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_descriptor, validate_optional_text, validate_pin,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use crate::verify::platform;

const RESOURCE: &str = "employee";

fn validate_master_data(payload: &EmployeeCreate) -> AppResult<()> {
    validate_required_text(&payload.employee_id, "employee_id", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.surname, "surname", MAX_NAME_LEN)?;
    validate_required_text(&payload.position, "position", MAX_NAME_LEN)?;
    validate_optional_text(&payload.department, "department", MAX_NAME_LEN)?;
    if let Some(ref pin) = payload.pin {
        validate_pin(pin)?;
    }
    Ok(())
}

/// List all employees
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EmployeeView>>> {
    let employees = employee::find_all(&state.pool).await?;
    Ok(Json(employees.iter().map(EmployeeView::from).collect()))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeView>> {
    let emp = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {id} not found")))?;
    Ok(Json(EmployeeView::from(&emp)))
}

/// Create a new employee
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<EmployeeView>> {
    validate_master_data(&payload)?;

    let emp = employee::create(&state.pool, payload).await?;
    let view = EmployeeView::from(&emp);

    let id = emp.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&view))
        .await;

    Ok(Json(view))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<EmployeeView>> {
    if let Some(ref first_name) = payload.first_name {
        validate_required_text(first_name, "first_name", MAX_NAME_LEN)?;
    }
    if let Some(ref surname) = payload.surname {
        validate_required_text(surname, "surname", MAX_NAME_LEN)?;
    }
    if let Some(ref position) = payload.position {
        validate_required_text(position, "position", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.department, "department", MAX_NAME_LEN)?;
    if let Some(ref pin) = payload.pin {
        validate_pin(pin)?;
    }

    let emp = employee::update(&state.pool, id, payload).await?;
    let view = EmployeeView::from(&emp);

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&view))
        .await;

    Ok(Json(view))
}

/// Hard delete an employee
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = employee::delete(&state.pool, id).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
        .await;

    Ok(Json(result))
}

/// Enroll a face descriptor (captured at the admin console, stored verbatim)
pub async fn enroll_face(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EnrollFaceRequest>,
) -> AppResult<Json<EmployeeView>> {
    validate_descriptor(&payload.descriptor)?;

    let emp = employee::enroll_face(&state.pool, id, &payload.descriptor).await?;
    let view = EmployeeView::from(&emp);

    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&view))
        .await;

    Ok(Json(view))
}

/// Begin platform credential enrollment for an employee
pub async fn credential_begin(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EnrollCredentialBeginResponse>> {
    let response = platform::begin_enrollment(&state.pool, id).await?;
    Ok(Json(response))
}

/// Complete platform credential enrollment
pub async fn credential_complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EnrollCredentialCompleteRequest>,
) -> AppResult<Json<EmployeeView>> {
    let emp = platform::complete_enrollment(
        &state.pool,
        &payload.challenge_id,
        &payload.credential_id,
        &payload.public_key,
    )
    .await?;

    if emp.id != id {
        // The challenge decides the subject; a mismatched path is a
        // client bug worth surfacing
        return Err(AppError::Validation(
            "Challenge was issued for a different employee".into(),
        ));
    }

    let view = EmployeeView::from(&emp);
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&view))
        .await;

    Ok(Json(view))
}
