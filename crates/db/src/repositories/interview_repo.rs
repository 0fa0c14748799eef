//! Repository for the `interviews` table and its read models.

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::types::{DbId, Timestamp};

use crate::models::interview::{
    Interview, InterviewListFilters, InterviewListItem, ScheduleInterview,
};

const INTERVIEW_COLUMNS: &str = "id, assignment_id, project_id, scheduled_at, duration_minutes, \
    interview_type, mode, meeting_link, notes, outcome, scheduled_by, created_at, updated_at";

/// Provides CRUD operations and read models for interviews.
pub struct InterviewRepo;

impl InterviewRepo {
    /// Insert a new interview within an open transaction.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &ScheduleInterview,
        project_id: DbId,
        meeting_link: Option<&str>,
        scheduled_by: Option<DbId>,
    ) -> Result<Interview, sqlx::Error> {
        let query = format!(
            "INSERT INTO interviews
                (assignment_id, project_id, scheduled_at, duration_minutes,
                 interview_type, mode, meeting_link, notes, scheduled_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {INTERVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(input.assignment_id)
            .bind(project_id)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(&input.interview_type)
            .bind(&input.mode)
            .bind(meeting_link)
            .bind(&input.notes)
            .bind(scheduled_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an interview by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Interview>, sqlx::Error> {
        let query = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1");
        sqlx::query_as::<_, Interview>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an assignment's interviews that still occupy a time slot
    /// (everything not cancelled), used for overlap checks.
    pub async fn list_active_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
    ) -> Result<Vec<Interview>, sqlx::Error> {
        let query = format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews
             WHERE assignment_id = $1
               AND (outcome IS NULL OR outcome <> 'cancelled')
             ORDER BY scheduled_at ASC"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(assignment_id)
            .fetch_all(pool)
            .await
    }

    /// Update outcome and notes within an open transaction.
    ///
    /// `notes` carries the full new notes text (the workflow appends reasons
    /// before calling); `None` leaves the column untouched.
    pub async fn update_outcome_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        outcome: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Interview, sqlx::Error> {
        let query = format!(
            "UPDATE interviews SET
                outcome = COALESCE($2, outcome),
                notes = COALESCE($3, notes),
                updated_at = now()
             WHERE id = $1
             RETURNING {INTERVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(id)
            .bind(outcome)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Move an interview to a new time window within an open transaction.
    pub async fn update_schedule_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        scheduled_at: Timestamp,
        duration_minutes: i32,
    ) -> Result<Interview, sqlx::Error> {
        let query = format!(
            "UPDATE interviews SET
                scheduled_at = $2,
                duration_minutes = $3,
                outcome = 'rescheduled',
                updated_at = now()
             WHERE id = $1
             RETURNING {INTERVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(id)
            .bind(scheduled_at)
            .bind(duration_minutes)
            .fetch_one(&mut **tx)
            .await
    }

    /// List interviews whose assignment currently carries the given
    /// sub-status key, as the normalized list read model.
    ///
    /// Supports text search (candidate name/email, project title, role
    /// name), a scheduled-at date range, and pagination. `expired` is
    /// derived at query time.
    pub async fn list_for_sub_status(
        pool: &PgPool,
        sub_status_key: &str,
        filters: &InterviewListFilters,
    ) -> Result<Vec<InterviewListItem>, sqlx::Error> {
        let (limit, offset) = filters.limit_offset();
        sqlx::query_as::<_, InterviewListItem>(
            "SELECT
                i.id, i.assignment_id, i.scheduled_at, i.duration_minutes,
                i.interview_type, i.mode, i.meeting_link, i.outcome,
                c.full_name AS candidate_name, c.email AS candidate_email,
                p.title AS project_title, r.name AS role_name,
                ss.name AS sub_status_name, ss.label AS sub_status_label,
                (i.scheduled_at < now()) AS expired
             FROM interviews i
             JOIN assignments a ON a.id = i.assignment_id
             JOIN candidates c ON c.id = a.candidate_id
             JOIN projects p ON p.id = i.project_id
             JOIN project_roles r ON r.id = a.role_id
             JOIN sub_statuses ss ON ss.id = a.sub_status_id
             WHERE ss.name = $1
               AND ($2::text IS NULL
                    OR c.full_name ILIKE '%' || $2 || '%'
                    OR c.email ILIKE '%' || $2 || '%'
                    OR p.title ILIKE '%' || $2 || '%'
                    OR r.name ILIKE '%' || $2 || '%')
               AND ($3::timestamptz IS NULL OR i.scheduled_at >= $3)
               AND ($4::timestamptz IS NULL OR i.scheduled_at <= $4)
             ORDER BY i.scheduled_at ASC, i.id ASC
             LIMIT $5 OFFSET $6",
        )
        .bind(sub_status_key)
        .bind(&filters.search)
        .bind(filters.from)
        .bind(filters.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count interviews scheduled inside `[start, end]`.
    pub async fn count_scheduled_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM interviews WHERE scheduled_at BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Count completed interviews (outcome recorded and not 'pending')
    /// scheduled inside `[start, end]`.
    pub async fn count_completed_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM interviews
             WHERE scheduled_at BETWEEN $1 AND $2
               AND outcome IS NOT NULL
               AND outcome <> 'pending'",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Count passed interviews scheduled inside `[start, end]`.
    pub async fn count_passed_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM interviews
             WHERE scheduled_at BETWEEN $1 AND $2
               AND outcome = 'passed'",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
