//! Interview sub-workflow: scheduling, rescheduling, outcome updates,
//! cancellation, listings, and dashboard metrics.
//!
//! Scheduling composes its cross-entity effects (interview insert,
//! assignment sub-status transition, interview history append) into a
//! single transaction rather than relying on callers to invoke them
//! together by convention.

use std::sync::Arc;

use sqlx::PgPool;
use validator::Validate;

use talentflow_core::interview::{
    generate_meeting_link, windows_overlap, InterviewMode, InterviewOutcome,
};
use talentflow_core::metrics::{month_bounds, pass_rate, week_bounds, InterviewDashboardMetrics};
use talentflow_core::status::SubStatusKey;
use talentflow_core::types::{DbId, Timestamp};
use talentflow_core::CoreError;
use talentflow_db::models::interview::{
    Interview, InterviewListFilters, InterviewListItem, InterviewStatusHistoryEntry,
    ScheduleInterview,
};
use talentflow_db::repositories::{
    AssignmentRepo, InterviewHistoryRepo, InterviewRepo,
};

use crate::audit::AuditTrailRecorder;
use crate::bulk::{self, BulkItemResult};
use crate::collaborators::NotificationSink;
use crate::error::{EngineError, EngineResult};
use crate::state_machine::AssignmentStateMachine;

/// History status written when only metadata changed.
const HISTORY_STATUS_UPDATED: &str = "updated";

/// Manages the interview sub-workflow attached to an assignment.
#[derive(Clone)]
pub struct InterviewSubWorkflow {
    pool: PgPool,
    state_machine: AssignmentStateMachine,
    notifier: Arc<dyn NotificationSink>,
}

impl InterviewSubWorkflow {
    pub fn new(
        pool: PgPool,
        state_machine: AssignmentStateMachine,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            pool,
            state_machine,
            notifier,
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Schedule an interview for an assignment.
    ///
    /// Fails with `SlotConflict` when the `[time, time+duration)` window
    /// overlaps another non-cancelled interview of the same assignment.
    /// Atomically inserts the interview, drives the assignment to
    /// `interview_scheduled`, and appends a `scheduled` history row; then
    /// notifies the assigned recruiter (fire-and-forget).
    pub async fn schedule(
        &self,
        input: ScheduleInterview,
        scheduled_by: Option<DbId>,
    ) -> EngineResult<Interview> {
        input.validate()?;
        let mode = InterviewMode::parse(&input.mode).ok_or_else(|| {
            EngineError::validation(format!("Unknown interview mode: '{}'", input.mode))
        })?;

        let assignment = AssignmentRepo::find_by_id(&self.pool, input.assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", input.assignment_id))?;

        self.ensure_slot_free(
            input.assignment_id,
            input.scheduled_at,
            input.duration_minutes,
            None,
        )
        .await?;

        let meeting_link = match (&input.meeting_link, mode) {
            (Some(link), _) => Some(link.clone()),
            (None, InterviewMode::Video) => Some(generate_meeting_link()),
            (None, _) => None,
        };

        let target = self
            .state_machine
            .resolve_known_sub_status(SubStatusKey::InterviewScheduled)
            .await?;
        let actor_name = self.state_machine.actor_name(scheduled_by).await;

        let mut tx = self.pool.begin().await?;

        let interview = InterviewRepo::create_in_tx(
            &mut tx,
            &input,
            assignment.project_id,
            meeting_link.as_deref(),
            scheduled_by,
        )
        .await?;

        self.state_machine
            .transition_sub_status_in_tx(
                &mut tx,
                input.assignment_id,
                &target,
                scheduled_by,
                actor_name.as_deref(),
                Some("Interview scheduled"),
            )
            .await?;

        AuditTrailRecorder::record_interview_change(
            &mut tx,
            interview.id,
            InterviewOutcome::Scheduled.as_str(),
            scheduled_by,
            actor_name.as_deref(),
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            interview_id = interview.id,
            assignment_id = input.assignment_id,
            scheduled_at = %interview.scheduled_at,
            "Interview scheduled"
        );

        if let Some(recruiter_id) = assignment.recruiter_id {
            let metadata = serde_json::json!({
                "interview_id": interview.id,
                "assignment_id": assignment.id,
                "scheduled_at": interview.scheduled_at,
            });
            if let Err(err) = self
                .notifier
                .notify(
                    recruiter_id,
                    "Interview scheduled",
                    &format!(
                        "An interview was scheduled for {}",
                        interview.scheduled_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    interview.meeting_link.as_deref(),
                    metadata,
                )
                .await
            {
                tracing::warn!(recruiter_id, error = %err, "Interview notification failed");
            }
        }

        Ok(interview)
    }

    /// Schedule a batch of interviews, one independent transaction per item.
    pub async fn create_bulk(
        &self,
        items: Vec<ScheduleInterview>,
        scheduled_by: Option<DbId>,
    ) -> Vec<BulkItemResult<Interview>> {
        bulk::run_each(items, |item| self.schedule(item, scheduled_by)).await
    }

    // -----------------------------------------------------------------------
    // Outcome and lifecycle updates
    // -----------------------------------------------------------------------

    /// Update an interview's outcome and/or drive a further assignment
    /// sub-status transition.
    ///
    /// A supplied `reason` is appended to the interview's free-text notes
    /// rather than overwriting them. A history row is always appended, with
    /// status `"updated"` when no new outcome is given.
    pub async fn set_outcome(
        &self,
        interview_id: DbId,
        outcome: Option<&str>,
        sub_status_key: Option<&str>,
        reason: Option<&str>,
        changed_by: Option<DbId>,
    ) -> EngineResult<Interview> {
        let interview = self.load(interview_id).await?;

        let outcome = outcome
            .map(|o| {
                InterviewOutcome::parse(o).ok_or_else(|| {
                    EngineError::validation(format!("Unknown interview outcome: '{o}'"))
                })
            })
            .transpose()?;

        // Resolve before opening the transaction so an unknown key fails fast.
        let sub_status = match sub_status_key {
            Some(key) => Some(self.state_machine.resolve_caller_sub_status(key).await?),
            None => None,
        };

        let notes = reason.map(|r| append_note(interview.notes.as_deref(), r));
        let actor_name = self.state_machine.actor_name(changed_by).await;
        let history_status = outcome
            .map(InterviewOutcome::as_str)
            .unwrap_or(HISTORY_STATUS_UPDATED);

        let mut tx = self.pool.begin().await?;

        let updated = InterviewRepo::update_outcome_in_tx(
            &mut tx,
            interview_id,
            outcome.map(InterviewOutcome::as_str),
            notes.as_deref(),
        )
        .await?;

        if let Some(target) = &sub_status {
            let assignment_id = interview.assignment_id.ok_or_else(|| {
                EngineError::validation(
                    "Cannot transition sub-status: interview has no assignment",
                )
            })?;
            self.state_machine
                .transition_sub_status_in_tx(
                    &mut tx,
                    assignment_id,
                    target,
                    changed_by,
                    actor_name.as_deref(),
                    reason,
                )
                .await?;
        }

        AuditTrailRecorder::record_interview_change(
            &mut tx,
            interview_id,
            history_status,
            changed_by,
            actor_name.as_deref(),
            reason,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(interview_id, status = history_status, "Interview outcome updated");
        Ok(updated)
    }

    /// Move an interview to a new time window.
    ///
    /// Re-checks slot conflicts against the assignment's other interviews
    /// and marks the outcome `rescheduled`.
    pub async fn reschedule(
        &self,
        interview_id: DbId,
        new_time: Timestamp,
        new_duration_minutes: Option<i32>,
        reason: Option<&str>,
        changed_by: Option<DbId>,
    ) -> EngineResult<Interview> {
        let interview = self.load(interview_id).await?;
        let duration = new_duration_minutes.unwrap_or(interview.duration_minutes);

        if let Some(assignment_id) = interview.assignment_id {
            self.ensure_slot_free(assignment_id, new_time, duration, Some(interview_id))
                .await?;
        }

        let actor_name = self.state_machine.actor_name(changed_by).await;

        let mut tx = self.pool.begin().await?;
        let updated =
            InterviewRepo::update_schedule_in_tx(&mut tx, interview_id, new_time, duration)
                .await?;
        AuditTrailRecorder::record_interview_change(
            &mut tx,
            interview_id,
            InterviewOutcome::Rescheduled.as_str(),
            changed_by,
            actor_name.as_deref(),
            reason,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(interview_id, scheduled_at = %new_time, "Interview rescheduled");
        Ok(updated)
    }

    /// Cancel an interview. A business-state transition, not a deletion:
    /// the row survives with outcome `cancelled`.
    pub async fn cancel(
        &self,
        interview_id: DbId,
        reason: Option<&str>,
        changed_by: Option<DbId>,
    ) -> EngineResult<Interview> {
        let interview = self.load(interview_id).await?;
        let notes = reason.map(|r| append_note(interview.notes.as_deref(), r));
        let actor_name = self.state_machine.actor_name(changed_by).await;

        let mut tx = self.pool.begin().await?;
        let updated = InterviewRepo::update_outcome_in_tx(
            &mut tx,
            interview_id,
            Some(InterviewOutcome::Cancelled.as_str()),
            notes.as_deref(),
        )
        .await?;
        AuditTrailRecorder::record_interview_change(
            &mut tx,
            interview_id,
            InterviewOutcome::Cancelled.as_str(),
            changed_by,
            actor_name.as_deref(),
            reason,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(interview_id, "Interview cancelled");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Read models
    // -----------------------------------------------------------------------

    /// List an interview's history, newest first.
    pub async fn list_history(
        &self,
        interview_id: DbId,
    ) -> EngineResult<Vec<InterviewStatusHistoryEntry>> {
        self.load(interview_id).await?;
        Ok(InterviewHistoryRepo::list_for_interview(&self.pool, interview_id).await?)
    }

    /// Interviews whose assignment is currently `interview_scheduled`.
    pub async fn list_upcoming(
        &self,
        filters: &InterviewListFilters,
    ) -> EngineResult<Vec<InterviewListItem>> {
        Ok(InterviewRepo::list_for_sub_status(
            &self.pool,
            SubStatusKey::InterviewScheduled.as_str(),
            filters,
        )
        .await?)
    }

    /// Interviews whose assignment is currently `interview_assigned`.
    pub async fn list_assigned(
        &self,
        filters: &InterviewListFilters,
    ) -> EngineResult<Vec<InterviewListItem>> {
        Ok(InterviewRepo::list_for_sub_status(
            &self.pool,
            SubStatusKey::InterviewAssigned.as_str(),
            filters,
        )
        .await?)
    }

    /// Dashboard counters relative to `now`: the Monday-through-Sunday week
    /// count plus calendar-month completed/passed counts and pass rate.
    pub async fn dashboard_metrics(
        &self,
        now: Timestamp,
    ) -> EngineResult<InterviewDashboardMetrics> {
        let (week_start, week_end) = week_bounds(now);
        let (month_start, month_end) = month_bounds(now);

        let this_week_count =
            InterviewRepo::count_scheduled_between(&self.pool, week_start, week_end).await?;
        let this_month_completed_count =
            InterviewRepo::count_completed_between(&self.pool, month_start, month_end).await?;
        let this_month_passed_count =
            InterviewRepo::count_passed_between(&self.pool, month_start, month_end).await?;

        Ok(InterviewDashboardMetrics {
            this_week_count,
            this_month_completed_count,
            this_month_passed_count,
            pass_rate: pass_rate(this_month_passed_count, this_month_completed_count),
        })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn load(&self, interview_id: DbId) -> EngineResult<Interview> {
        InterviewRepo::find_by_id(&self.pool, interview_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Interview", interview_id))
    }

    /// Fail with `SlotConflict` if the window overlaps another active
    /// interview for the assignment. `exclude` skips the interview being
    /// rescheduled.
    async fn ensure_slot_free(
        &self,
        assignment_id: DbId,
        start: Timestamp,
        duration_minutes: i32,
        exclude: Option<DbId>,
    ) -> EngineResult<()> {
        let existing =
            InterviewRepo::list_active_for_assignment(&self.pool, assignment_id).await?;
        for other in existing {
            if Some(other.id) == exclude {
                continue;
            }
            if windows_overlap(
                start,
                duration_minutes,
                other.scheduled_at,
                other.duration_minutes,
            ) {
                return Err(EngineError::Core(CoreError::SlotConflict {
                    existing_interview_id: other.id,
                    scheduled_at: other.scheduled_at,
                }));
            }
        }
        Ok(())
    }
}

/// Append `reason` to existing notes, preserving prior text.
fn append_note(existing: Option<&str>, reason: &str) -> String {
    match existing {
        Some(notes) if !notes.is_empty() => format!("{notes}\n{reason}"),
        _ => reason.to_string(),
    }
}
