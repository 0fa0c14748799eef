//! Candidate-project assignment models and the assignment status history.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentflow_core::types::{DbId, StatusId, Timestamp};

/// A row from the `assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub candidate_id: DbId,
    pub project_id: DbId,
    pub role_id: DbId,
    pub recruiter_id: Option<DbId>,
    pub main_status_id: StatusId,
    pub sub_status_id: StatusId,
    pub is_sent_for_document_verification: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub candidate_id: DbId,
    pub project_id: DbId,
    pub role_id: DbId,
    pub recruiter_id: Option<DbId>,
}

/// Assignment with its related entities resolved, as returned by the state
/// machine. One normalized shape; consumers never re-join.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    pub id: DbId,
    pub candidate_id: DbId,
    pub candidate_name: String,
    pub candidate_email: String,
    pub project_id: DbId,
    pub project_title: String,
    pub role_id: DbId,
    pub role_name: String,
    pub recruiter_id: Option<DbId>,
    pub main_status_id: StatusId,
    pub main_status_name: String,
    pub main_status_label: String,
    pub sub_status_id: StatusId,
    pub sub_status_name: String,
    pub sub_status_label: String,
    pub is_sent_for_document_verification: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `assignment_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentStatusHistoryEntry {
    pub id: DbId,
    pub assignment_id: DbId,
    pub previous_main_status_id: Option<StatusId>,
    pub new_main_status_id: StatusId,
    pub previous_sub_status_id: Option<StatusId>,
    pub new_sub_status_id: StatusId,
    pub previous_main_status_label: Option<String>,
    pub new_main_status_label: String,
    pub previous_sub_status_label: Option<String>,
    pub new_sub_status_label: String,
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an assignment history row.
#[derive(Debug, Clone)]
pub struct CreateAssignmentHistory {
    pub assignment_id: DbId,
    pub previous_main_status_id: Option<StatusId>,
    pub new_main_status_id: StatusId,
    pub previous_sub_status_id: Option<StatusId>,
    pub new_sub_status_id: StatusId,
    pub previous_main_status_label: Option<String>,
    pub new_main_status_label: String,
    pub previous_sub_status_label: Option<String>,
    pub new_sub_status_label: String,
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,
    pub reason: Option<String>,
}
