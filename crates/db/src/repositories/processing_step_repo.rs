//! Repository for the `processing_steps` table.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::{DbId, Timestamp};

use crate::models::processing::ProcessingStep;

const STEP_COLUMNS: &str = "id, assignment_id, step_key, status, sla_days, due_date, \
    started_at, completed_at, submitted_at, notes, not_applicable_reason, rejection_reason, \
    created_at, updated_at";

/// Provides CRUD operations for processing steps. Step status is only ever
/// written through the `_in_tx` methods the workflow calls inside its
/// transaction.
pub struct ProcessingStepRepo;

impl ProcessingStepRepo {
    /// Insert a step within an open transaction. `ON CONFLICT DO NOTHING`
    /// keeps initialization idempotent; returns the row either way.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: DbId,
        step_key: &str,
        sla_days: i32,
        due_date: Option<Timestamp>,
    ) -> Result<ProcessingStep, sqlx::Error> {
        let insert = format!(
            "INSERT INTO processing_steps (assignment_id, step_key, sla_days, due_date)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (assignment_id, step_key) DO NOTHING
             RETURNING {STEP_COLUMNS}"
        );
        if let Some(step) = sqlx::query_as::<_, ProcessingStep>(&insert)
            .bind(assignment_id)
            .bind(step_key)
            .bind(sla_days)
            .bind(due_date)
            .fetch_optional(&mut **tx)
            .await?
        {
            return Ok(step);
        }

        let select = format!(
            "SELECT {STEP_COLUMNS} FROM processing_steps
             WHERE assignment_id = $1 AND step_key = $2"
        );
        sqlx::query_as::<_, ProcessingStep>(&select)
            .bind(assignment_id)
            .bind(step_key)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a step by assignment and key.
    pub async fn find_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
        step_key: &str,
    ) -> Result<Option<ProcessingStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM processing_steps
             WHERE assignment_id = $1 AND step_key = $2"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(assignment_id)
            .bind(step_key)
            .fetch_optional(pool)
            .await
    }

    /// Find a step by assignment and key inside an open transaction.
    pub async fn find_for_assignment_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: DbId,
        step_key: &str,
    ) -> Result<Option<ProcessingStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM processing_steps
             WHERE assignment_id = $1 AND step_key = $2"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(assignment_id)
            .bind(step_key)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List all steps for an assignment. Rows come back unordered with
    /// respect to the pipeline; callers sort by the step catalog.
    pub async fn list_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
    ) -> Result<Vec<ProcessingStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM processing_steps WHERE assignment_id = $1"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(assignment_id)
            .fetch_all(pool)
            .await
    }

    /// Update a step's status within an open transaction.
    ///
    /// `started_at` only fills in if currently NULL (first move to
    /// IN_PROGRESS); `completed_at` and `not_applicable_reason` only write
    /// when provided.
    pub async fn update_status_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: &str,
        notes: Option<&str>,
        started_at: Option<Timestamp>,
        completed_at: Option<Timestamp>,
        not_applicable_reason: Option<&str>,
    ) -> Result<ProcessingStep, sqlx::Error> {
        let query = format!(
            "UPDATE processing_steps SET
                status = $2,
                notes = COALESCE($3, notes),
                started_at = COALESCE(started_at, $4),
                completed_at = COALESCE($5, completed_at),
                not_applicable_reason = COALESCE($6, not_applicable_reason),
                updated_at = now()
             WHERE id = $1
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .bind(started_at)
            .bind(completed_at)
            .bind(not_applicable_reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set or overwrite the submission date within an open transaction.
    pub async fn set_submitted_at_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        submitted_at: Timestamp,
    ) -> Result<ProcessingStep, sqlx::Error> {
        let query = format!(
            "UPDATE processing_steps SET submitted_at = $2, updated_at = now()
             WHERE id = $1
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(id)
            .bind(submitted_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Mark a step cancelled (terminal REJECTED with a reason) within an
    /// open transaction.
    pub async fn cancel_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: &str,
        rejection_reason: &str,
    ) -> Result<ProcessingStep, sqlx::Error> {
        let query = format!(
            "UPDATE processing_steps SET
                status = $2,
                rejection_reason = $3,
                updated_at = now()
             WHERE id = $1
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, ProcessingStep>(&query)
            .bind(id)
            .bind(status)
            .bind(rejection_reason)
            .fetch_one(&mut **tx)
            .await
    }
}
