//! Platform user rows (recruiters, verifiers, schedulers).

use serde::Serialize;
use sqlx::FromRow;
use talentflow_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub created_at: Timestamp,
}
