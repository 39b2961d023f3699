//! Shared test fixtures

use sqlx::SqlitePool;

use kiosk_server::db::DbService;
use kiosk_server::db::repository::employee;
use shared::models::{Employee, EmployeeCreate};

/// Fresh in-memory database with migrations applied
pub async fn test_pool() -> SqlitePool {
    DbService::new_in_memory()
        .await
        .expect("in-memory database")
        .pool
}

/// Create an employee with sensible defaults
pub async fn create_employee(pool: &SqlitePool, badge: &str, pin: Option<&str>) -> Employee {
    employee::create(
        pool,
        EmployeeCreate {
            employee_id: badge.to_string(),
            first_name: "Rudo".to_string(),
            surname: format!("Moyo-{badge}"),
            position: "Machine Operator".to_string(),
            department: Some("Processing".to_string()),
            pin: pin.map(str::to_string),
        },
    )
    .await
    .expect("create employee")
}
