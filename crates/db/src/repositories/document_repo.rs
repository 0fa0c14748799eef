//! Repositories for document requirements and verifications.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::DbId;

use crate::models::document::{CreateDocumentVerification, DocumentRequirement, DocumentVerification};

const REQUIREMENT_COLUMNS: &str =
    "id, step_key, document_type, label, mandatory, role_id, created_at";

const VERIFICATION_COLUMNS: &str = "id, assignment_id, step_key, document_id, requirement_id, \
    status, verified_by, notes, created_at, updated_at";

/// Read access to the document requirement catalog.
pub struct DocumentRequirementRepo;

impl DocumentRequirementRepo {
    /// List requirements for a step: global rows plus any row specific to
    /// the given role, ordered by id for stable missing-label reporting.
    pub async fn list_for_step(
        pool: &PgPool,
        step_key: &str,
        role_id: DbId,
    ) -> Result<Vec<DocumentRequirement>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM document_requirements
             WHERE step_key = $1 AND (role_id IS NULL OR role_id = $2)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, DocumentRequirement>(&query)
            .bind(step_key)
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// Find the requirement matching a document type for a step, preferring
    /// a role-specific row over a global one.
    pub async fn find_for_document_type(
        pool: &PgPool,
        step_key: &str,
        document_type: &str,
        role_id: DbId,
    ) -> Result<Option<DocumentRequirement>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM document_requirements
             WHERE step_key = $1 AND document_type = $2
               AND (role_id IS NULL OR role_id = $3)
             ORDER BY role_id NULLS LAST
             LIMIT 1"
        );
        sqlx::query_as::<_, DocumentRequirement>(&query)
            .bind(step_key)
            .bind(document_type)
            .bind(role_id)
            .fetch_optional(pool)
            .await
    }
}

/// Provides CRUD operations for document verifications.
pub struct DocumentVerificationRepo;

impl DocumentVerificationRepo {
    /// Insert a verification record within an open transaction.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateDocumentVerification,
    ) -> Result<DocumentVerification, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_verifications
                (assignment_id, step_key, document_id, requirement_id, status, verified_by, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {VERIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVerification>(&query)
            .bind(input.assignment_id)
            .bind(&input.step_key)
            .bind(input.document_id)
            .bind(input.requirement_id)
            .bind(&input.status)
            .bind(input.verified_by)
            .bind(&input.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find the verification for a specific document on a step, if any.
    pub async fn find_for_document(
        pool: &PgPool,
        assignment_id: DbId,
        step_key: &str,
        document_id: DbId,
    ) -> Result<Option<DocumentVerification>, sqlx::Error> {
        let query = format!(
            "SELECT {VERIFICATION_COLUMNS} FROM document_verifications
             WHERE assignment_id = $1 AND step_key = $2 AND document_id = $3"
        );
        sqlx::query_as::<_, DocumentVerification>(&query)
            .bind(assignment_id)
            .bind(step_key)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// List the verified verifications for a step of an assignment.
    pub async fn list_verified_for_step(
        pool: &PgPool,
        assignment_id: DbId,
        step_key: &str,
    ) -> Result<Vec<DocumentVerification>, sqlx::Error> {
        let query = format!(
            "SELECT {VERIFICATION_COLUMNS} FROM document_verifications
             WHERE assignment_id = $1 AND step_key = $2 AND status = 'verified'
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, DocumentVerification>(&query)
            .bind(assignment_id)
            .bind(step_key)
            .fetch_all(pool)
            .await
    }
}
