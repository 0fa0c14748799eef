//! Repository for the `main_statuses` and `sub_statuses` catalog tables.

use sqlx::PgPool;
use talentflow_core::types::StatusId;

use crate::models::status::StatusRecord;

const STATUS_COLUMNS: &str = "id, name, label";

/// Read access to the status catalog.
///
/// The closed key sets live in `talentflow_core::status`; this repository
/// resolves a key to its numeric id and display label.
pub struct StatusRepo;

impl StatusRepo {
    /// Resolve a main-status key. Returns `None` for unknown keys.
    pub async fn resolve_main(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<StatusRecord>, sqlx::Error> {
        let query = format!("SELECT {STATUS_COLUMNS} FROM main_statuses WHERE name = $1");
        sqlx::query_as::<_, StatusRecord>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a sub-status key. Returns `None` for unknown keys.
    pub async fn resolve_sub(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<StatusRecord>, sqlx::Error> {
        let query = format!("SELECT {STATUS_COLUMNS} FROM sub_statuses WHERE name = $1");
        sqlx::query_as::<_, StatusRecord>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Find a main-status record by its catalog id.
    pub async fn find_main_by_id(
        pool: &PgPool,
        id: StatusId,
    ) -> Result<Option<StatusRecord>, sqlx::Error> {
        let query = format!("SELECT {STATUS_COLUMNS} FROM main_statuses WHERE id = $1");
        sqlx::query_as::<_, StatusRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a sub-status record by its catalog id.
    pub async fn find_sub_by_id(
        pool: &PgPool,
        id: StatusId,
    ) -> Result<Option<StatusRecord>, sqlx::Error> {
        let query = format!("SELECT {STATUS_COLUMNS} FROM sub_statuses WHERE id = $1");
        sqlx::query_as::<_, StatusRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
