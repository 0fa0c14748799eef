//! Processing step models and the step status history.

use serde::Serialize;
use sqlx::FromRow;
use talentflow_core::types::{DbId, Timestamp};

/// A row from the `processing_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProcessingStep {
    pub id: DbId,
    pub assignment_id: DbId,
    pub step_key: String,
    pub status: String,
    pub sla_days: i32,
    pub due_date: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub submitted_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub not_applicable_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `processing_step_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProcessingStepHistoryEntry {
    pub id: DbId,
    pub processing_step_id: DbId,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}
