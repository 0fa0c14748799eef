//! Repository for the append-only `processing_step_history` table.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::DbId;

use crate::models::processing::ProcessingStepHistoryEntry;

const HISTORY_COLUMNS: &str =
    "id, processing_step_id, previous_status, new_status, actor_id, actor_name, notes, created_at";

/// Insert-only access to processing step history.
pub struct ProcessingHistoryRepo;

impl ProcessingHistoryRepo {
    /// Append a history row within an open transaction.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        processing_step_id: DbId,
        previous_status: Option<&str>,
        new_status: &str,
        actor_id: Option<DbId>,
        actor_name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<ProcessingStepHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO processing_step_history
                (processing_step_id, previous_status, new_status, actor_id, actor_name, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {HISTORY_COLUMNS}"
        );
        sqlx::query_as::<_, ProcessingStepHistoryEntry>(&query)
            .bind(processing_step_id)
            .bind(previous_status)
            .bind(new_status)
            .bind(actor_id)
            .bind(actor_name)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// List history for a step, newest first.
    pub async fn list_for_step(
        pool: &PgPool,
        processing_step_id: DbId,
    ) -> Result<Vec<ProcessingStepHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM processing_step_history
             WHERE processing_step_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProcessingStepHistoryEntry>(&query)
            .bind(processing_step_id)
            .fetch_all(pool)
            .await
    }
}
