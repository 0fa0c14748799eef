//! Repository for the append-only `assignment_status_history` table.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::DbId;

use crate::models::assignment::{AssignmentStatusHistoryEntry, CreateAssignmentHistory};

const HISTORY_COLUMNS: &str = "id, assignment_id, \
    previous_main_status_id, new_main_status_id, previous_sub_status_id, new_sub_status_id, \
    previous_main_status_label, new_main_status_label, \
    previous_sub_status_label, new_sub_status_label, \
    actor_id, actor_name, reason, created_at";

/// Insert-only access to assignment status history. Rows are never updated
/// or deleted.
pub struct AssignmentHistoryRepo;

impl AssignmentHistoryRepo {
    /// Append a history row within an open transaction, so a failed append
    /// rolls the whole transition back.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateAssignmentHistory,
    ) -> Result<AssignmentStatusHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignment_status_history
                (assignment_id,
                 previous_main_status_id, new_main_status_id,
                 previous_sub_status_id, new_sub_status_id,
                 previous_main_status_label, new_main_status_label,
                 previous_sub_status_label, new_sub_status_label,
                 actor_id, actor_name, reason)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {HISTORY_COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentStatusHistoryEntry>(&query)
            .bind(input.assignment_id)
            .bind(input.previous_main_status_id)
            .bind(input.new_main_status_id)
            .bind(input.previous_sub_status_id)
            .bind(input.new_sub_status_id)
            .bind(&input.previous_main_status_label)
            .bind(&input.new_main_status_label)
            .bind(&input.previous_sub_status_label)
            .bind(&input.new_sub_status_label)
            .bind(input.actor_id)
            .bind(&input.actor_name)
            .bind(&input.reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// List history for an assignment, newest first.
    pub async fn list_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
    ) -> Result<Vec<AssignmentStatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM assignment_status_history
             WHERE assignment_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AssignmentStatusHistoryEntry>(&query)
            .bind(assignment_id)
            .fetch_all(pool)
            .await
    }
}
