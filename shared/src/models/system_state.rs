//! System State Model (Singleton)

use serde::{Deserialize, Serialize};

/// Process-independent markers, one row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SystemState {
    pub id: i64,
    /// Idempotency guard for the daily reconciliation job, local
    /// calendar date "YYYY-MM-DD"; unset until the first completed run
    pub last_reconcile_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
