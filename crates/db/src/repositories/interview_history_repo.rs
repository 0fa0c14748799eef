//! Repository for the append-only `interview_status_history` table.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::DbId;

use crate::models::interview::InterviewStatusHistoryEntry;

const HISTORY_COLUMNS: &str = "id, interview_id, status, actor_id, actor_name, reason, created_at";

/// Insert-only access to interview status history.
pub struct InterviewHistoryRepo;

impl InterviewHistoryRepo {
    /// Append a history row within an open transaction.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        interview_id: DbId,
        status: &str,
        actor_id: Option<DbId>,
        actor_name: Option<&str>,
        reason: Option<&str>,
    ) -> Result<InterviewStatusHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO interview_status_history
                (interview_id, status, actor_id, actor_name, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {HISTORY_COLUMNS}"
        );
        sqlx::query_as::<_, InterviewStatusHistoryEntry>(&query)
            .bind(interview_id)
            .bind(status)
            .bind(actor_id)
            .bind(actor_name)
            .bind(reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// List history for an interview, newest first.
    pub async fn list_for_interview(
        pool: &PgPool,
        interview_id: DbId,
    ) -> Result<Vec<InterviewStatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM interview_status_history
             WHERE interview_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InterviewStatusHistoryEntry>(&query)
            .bind(interview_id)
            .fetch_all(pool)
            .await
    }
}
