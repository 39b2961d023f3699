//! Employee Repository

use sqlx::SqlitePool;

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, employee_id, first_name, surname, position, department, status, \
     last_login_time, pin, face_descriptor, credential_id, public_key, created_at, updated_at";

/// Find all employees ordered by first name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee ORDER BY first_name, surname"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find employee by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee =
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(employee)
}

/// Find employee by human-facing badge number
pub async fn find_by_employee_id(
    pool: &SqlitePool,
    employee_id: &str,
) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE employee_id = ?"
    ))
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// All employees holding the given PIN
///
/// The verifier requires exactly one row; more than one is an integrity
/// fault it refuses to guess around, so this returns the full set.
pub async fn find_by_pin(pool: &SqlitePool, pin: &str) -> RepoResult<Vec<Employee>> {
    let employees =
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE pin = ?"))
            .bind(pin)
            .fetch_all(pool)
            .await?;
    Ok(employees)
}

/// All employees with an enrolled face descriptor
pub async fn find_with_face(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE face_descriptor IS NOT NULL"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// All employees with a bound platform credential
pub async fn find_with_credential(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE credential_id IS NOT NULL"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find the owner of a platform credential id (hex)
pub async fn find_by_credential_id(
    pool: &SqlitePool,
    credential_id: &str,
) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE credential_id = ?"
    ))
    .bind(credential_id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// Logged-in employees whose last login is strictly before the cutoff
///
/// Reconciliation input: these never clocked out on a prior day.
pub async fn find_stale_logins(pool: &SqlitePool, cutoff_millis: i64) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee \
         WHERE status = 'LOGGED_IN' AND last_login_time IS NOT NULL AND last_login_time < ?"
    ))
    .bind(cutoff_millis)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Create a new employee
pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    // Best-effort duplicate checks for friendlier errors; the UNIQUE
    // indexes remain the authority under concurrency
    if find_by_employee_id(pool, &data.employee_id).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Employee ID '{}' already exists",
            data.employee_id
        )));
    }
    if let Some(ref pin) = data.pin
        && !find_by_pin(pool, pin).await?.is_empty()
    {
        return Err(RepoError::Duplicate("PIN is already in use".to_string()));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO employee (id, employee_id, first_name, surname, position, department, \
         status, pin, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 'LOGGED_OUT', ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.employee_id)
    .bind(&data.first_name)
    .bind(&data.surname)
    .bind(&data.position)
    .bind(&data.department)
    .bind(&data.pin)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Update employee master data
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    if let Some(ref pin) = data.pin {
        // PIN change must not steal another employee's code
        let holders = find_by_pin(pool, pin).await?;
        if holders.iter().any(|e| e.id != id) {
            return Err(RepoError::Duplicate("PIN is already in use".to_string()));
        }
    }

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET \
            first_name = COALESCE(?1, first_name), \
            surname = COALESCE(?2, surname), \
            position = COALESCE(?3, position), \
            department = COALESCE(?4, department), \
            pin = COALESCE(?5, pin), \
            updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(&data.first_name)
    .bind(&data.surname)
    .bind(&data.position)
    .bind(&data.department)
    .bind(&data.pin)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Self-service PIN change, guarded by the current PIN
pub async fn change_pin(
    pool: &SqlitePool,
    id: i64,
    current_pin: &str,
    new_pin: &str,
) -> RepoResult<()> {
    let holders = find_by_pin(pool, new_pin).await?;
    if holders.iter().any(|e| e.id != id) {
        return Err(RepoError::Duplicate("PIN is already in use".to_string()));
    }

    let rows = sqlx::query(
        "UPDATE employee SET pin = ?1, updated_at = ?2 WHERE id = ?3 AND pin = ?4",
    )
    .bind(new_pin)
    .bind(now_millis())
    .bind(id)
    .bind(current_pin)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation("Current PIN is incorrect".into()));
    }
    Ok(())
}

/// Store a freshly captured face descriptor (replaces any previous one)
pub async fn enroll_face(pool: &SqlitePool, id: i64, descriptor: &[f32]) -> RepoResult<Employee> {
    let json = serde_json::to_string(descriptor)
        .map_err(|e| RepoError::Database(format!("Failed to encode descriptor: {e}")))?;

    let rows = sqlx::query(
        "UPDATE employee SET face_descriptor = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(json)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Bind a platform credential to an employee
pub async fn enroll_credential(
    pool: &SqlitePool,
    id: i64,
    credential_id: &str,
    public_key: &str,
) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET credential_id = ?1, public_key = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(credential_id)
    .bind(public_key)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Hard delete an employee (no recycle bin for employees)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(true)
}

/// Integrity sweep: PINs held by more than one employee
///
/// Should be impossible given the partial UNIQUE index; the sweep exists
/// to flag store corruption or out-of-band edits.
pub async fn find_duplicate_pins(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let pins = sqlx::query_scalar::<_, String>(
        "SELECT pin FROM employee WHERE pin IS NOT NULL GROUP BY pin HAVING COUNT(*) > 1",
    )
    .fetch_all(pool)
    .await?;
    Ok(pins)
}

/// Integrity sweep: credential ids bound to more than one employee
pub async fn find_duplicate_credentials(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT credential_id FROM employee WHERE credential_id IS NOT NULL \
         GROUP BY credential_id HAVING COUNT(*) > 1",
    )
    .fetch_all(pool)
    .await?;
    Ok(ids)
}
