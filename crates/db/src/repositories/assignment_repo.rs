//! Repository for the `assignments` table.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::{DbId, StatusId};

use crate::models::assignment::{Assignment, AssignmentDetail, CreateAssignment};

const ASSIGNMENT_COLUMNS: &str = "id, candidate_id, project_id, role_id, recruiter_id, \
    main_status_id, sub_status_id, is_sent_for_document_verification, created_at, updated_at";

/// Joined select producing [`AssignmentDetail`].
const DETAIL_SELECT: &str = "SELECT
        a.id, a.candidate_id, c.full_name AS candidate_name, c.email AS candidate_email,
        a.project_id, p.title AS project_title,
        a.role_id, r.name AS role_name,
        a.recruiter_id,
        a.main_status_id, ms.name AS main_status_name, ms.label AS main_status_label,
        a.sub_status_id, ss.name AS sub_status_name, ss.label AS sub_status_label,
        a.is_sent_for_document_verification, a.created_at, a.updated_at
     FROM assignments a
     JOIN candidates c ON c.id = a.candidate_id
     JOIN projects p ON p.id = a.project_id
     JOIN project_roles r ON r.id = a.role_id
     JOIN main_statuses ms ON ms.id = a.main_status_id
     JOIN sub_statuses ss ON ss.id = a.sub_status_id";

/// Provides CRUD operations for assignments.
///
/// Status columns are only ever written through the `_in_tx` methods, which
/// the state machine calls inside its transition transaction.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment with the given initial statuses.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssignment,
        main_status_id: StatusId,
        sub_status_id: StatusId,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignments
                (candidate_id, project_id, role_id, recruiter_id, main_status_id, sub_status_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(input.candidate_id)
            .bind(input.project_id)
            .bind(input.role_id)
            .bind(input.recruiter_id)
            .bind(main_status_id)
            .bind(sub_status_id)
            .fetch_one(pool)
            .await
    }

    /// Find an assignment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an assignment inside an open transaction.
    pub async fn find_by_id_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find an assignment with its relations resolved.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update only the sub-status reference, within an open transaction.
    pub async fn update_sub_status_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        sub_status_id: StatusId,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET sub_status_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(sub_status_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update only the main-status reference, within an open transaction.
    pub async fn update_main_status_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        main_status_id: StatusId,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET main_status_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(main_status_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Permanently mark an assignment as exempt from document-verification
    /// gating.
    pub async fn mark_sent_for_document_verification(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "UPDATE assignments
             SET is_sent_for_document_verification = TRUE, updated_at = now()
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
