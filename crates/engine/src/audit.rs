//! Append-only audit trail writes.
//!
//! All history rows go through this recorder, and always inside the
//! caller's transaction: if the append fails, the whole transition rolls
//! back. History completeness is a hard invariant, not best-effort.

use sqlx::{Postgres, Transaction};
use talentflow_core::types::DbId;
use talentflow_db::models::assignment::{AssignmentStatusHistoryEntry, CreateAssignmentHistory};
use talentflow_db::models::interview::InterviewStatusHistoryEntry;
use talentflow_db::models::processing::ProcessingStepHistoryEntry;
use talentflow_db::repositories::{
    AssignmentHistoryRepo, InterviewHistoryRepo, ProcessingHistoryRepo,
};

/// Writes immutable history rows for status changes.
pub struct AuditTrailRecorder;

impl AuditTrailRecorder {
    /// Append an assignment status history row.
    pub async fn record_assignment_change(
        tx: &mut Transaction<'_, Postgres>,
        entry: &CreateAssignmentHistory,
    ) -> Result<AssignmentStatusHistoryEntry, sqlx::Error> {
        let row = AssignmentHistoryRepo::create_in_tx(tx, entry).await?;
        tracing::debug!(
            assignment_id = entry.assignment_id,
            new_sub_status = %entry.new_sub_status_label,
            "Assignment history appended"
        );
        Ok(row)
    }

    /// Append an interview status history row.
    pub async fn record_interview_change(
        tx: &mut Transaction<'_, Postgres>,
        interview_id: DbId,
        status: &str,
        actor_id: Option<DbId>,
        actor_name: Option<&str>,
        reason: Option<&str>,
    ) -> Result<InterviewStatusHistoryEntry, sqlx::Error> {
        let row = InterviewHistoryRepo::create_in_tx(
            tx,
            interview_id,
            status,
            actor_id,
            actor_name,
            reason,
        )
        .await?;
        tracing::debug!(interview_id, status, "Interview history appended");
        Ok(row)
    }

    /// Append a processing step history row.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_step_change(
        tx: &mut Transaction<'_, Postgres>,
        processing_step_id: DbId,
        previous_status: Option<&str>,
        new_status: &str,
        actor_id: Option<DbId>,
        actor_name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<ProcessingStepHistoryEntry, sqlx::Error> {
        let row = ProcessingHistoryRepo::create_in_tx(
            tx,
            processing_step_id,
            previous_status,
            new_status,
            actor_id,
            actor_name,
            notes,
        )
        .await?;
        tracing::debug!(processing_step_id, new_status, "Step history appended");
        Ok(row)
    }
}
