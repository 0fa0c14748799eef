//! The assignment state machine: the only sanctioned way to change an
//! assignment's main or sub status.
//!
//! Each transition runs in one transaction covering the status write plus
//! the audit history append; if either fails the whole transition rolls
//! back. Main status is changed by a distinct, explicit operation and never
//! implicitly alongside a sub-status change.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use talentflow_core::status::SubStatusKey;
use talentflow_core::types::DbId;
use talentflow_db::models::assignment::{Assignment, AssignmentDetail, CreateAssignmentHistory};
use talentflow_db::models::status::StatusRecord;
use talentflow_db::repositories::{AssignmentRepo, StatusRepo};

use crate::audit::AuditTrailRecorder;
use crate::collaborators::IdentityLookup;
use crate::error::{EngineError, EngineResult};

/// Applies status transitions to candidate-project assignments.
#[derive(Clone)]
pub struct AssignmentStateMachine {
    pool: PgPool,
    identity: Arc<dyn IdentityLookup>,
}

impl AssignmentStateMachine {
    pub fn new(pool: PgPool, identity: Arc<dyn IdentityLookup>) -> Self {
        Self { pool, identity }
    }

    /// Transition an assignment to a new sub-status.
    ///
    /// `new_sub_status_key` is caller-supplied; an unresolvable key is a
    /// validation failure, not a configuration error. Returns the updated
    /// assignment with its relations resolved.
    pub async fn transition_sub_status(
        &self,
        assignment_id: DbId,
        new_sub_status_key: &str,
        actor_id: Option<DbId>,
        reason: Option<&str>,
    ) -> EngineResult<AssignmentDetail> {
        let target = self.resolve_caller_sub_status(new_sub_status_key).await?;
        let actor_name = self.actor_name(actor_id).await;

        let mut tx = self.pool.begin().await?;
        self.transition_sub_status_in_tx(
            &mut tx,
            assignment_id,
            &target,
            actor_id,
            actor_name.as_deref(),
            reason,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            assignment_id,
            new_sub_status = %target.name,
            actor_id,
            "Assignment sub-status transitioned"
        );

        self.detail(assignment_id).await
    }

    /// Transition an assignment to a new main status. Distinct from
    /// sub-status transitions; never invoked implicitly.
    pub async fn transition_main_status(
        &self,
        assignment_id: DbId,
        new_main_status_key: &str,
        actor_id: Option<DbId>,
        reason: Option<&str>,
    ) -> EngineResult<AssignmentDetail> {
        let target = StatusRepo::resolve_main(&self.pool, new_main_status_key)
            .await?
            .ok_or_else(|| {
                EngineError::validation(format!(
                    "Unknown main status key: '{new_main_status_key}'"
                ))
            })?;
        let actor_name = self.actor_name(actor_id).await;

        let mut tx = self.pool.begin().await?;

        let assignment = Self::load_in_tx(&mut tx, assignment_id).await?;
        let (prev_main, prev_sub) = self.current_statuses(&assignment).await?;

        let updated =
            AssignmentRepo::update_main_status_in_tx(&mut tx, assignment_id, target.id).await?;

        AuditTrailRecorder::record_assignment_change(
            &mut tx,
            &CreateAssignmentHistory {
                assignment_id,
                previous_main_status_id: Some(prev_main.id),
                new_main_status_id: target.id,
                previous_sub_status_id: Some(prev_sub.id),
                new_sub_status_id: prev_sub.id,
                previous_main_status_label: Some(prev_main.label.clone()),
                new_main_status_label: target.label.clone(),
                previous_sub_status_label: Some(prev_sub.label.clone()),
                new_sub_status_label: prev_sub.label.clone(),
                actor_id,
                actor_name,
                reason: reason.map(str::to_owned),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            assignment_id = updated.id,
            new_main_status = %target.name,
            actor_id,
            "Assignment main status transitioned"
        );

        self.detail(assignment_id).await
    }

    /// Apply a sub-status transition inside a caller-owned transaction.
    ///
    /// Used by the interview and processing workflows to compose their
    /// cross-entity effects into a single transaction.
    pub(crate) async fn transition_sub_status_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: DbId,
        target: &StatusRecord,
        actor_id: Option<DbId>,
        actor_name: Option<&str>,
        reason: Option<&str>,
    ) -> EngineResult<Assignment> {
        let assignment = Self::load_in_tx(tx, assignment_id).await?;
        let (main, prev_sub) = self.current_statuses(&assignment).await?;

        let updated =
            AssignmentRepo::update_sub_status_in_tx(tx, assignment_id, target.id).await?;

        AuditTrailRecorder::record_assignment_change(
            tx,
            &CreateAssignmentHistory {
                assignment_id,
                previous_main_status_id: Some(main.id),
                new_main_status_id: main.id,
                previous_sub_status_id: Some(prev_sub.id),
                new_sub_status_id: target.id,
                previous_main_status_label: Some(main.label.clone()),
                new_main_status_label: main.label.clone(),
                previous_sub_status_label: Some(prev_sub.label.clone()),
                new_sub_status_label: target.label.clone(),
                actor_id,
                actor_name: actor_name.map(str::to_owned),
                reason: reason.map(str::to_owned),
            },
        )
        .await?;

        Ok(updated)
    }

    /// Resolve a caller-supplied sub-status key, surfacing unknown keys as
    /// validation failures.
    pub(crate) async fn resolve_caller_sub_status(
        &self,
        key: &str,
    ) -> EngineResult<StatusRecord> {
        StatusRepo::resolve_sub(&self.pool, key).await?.ok_or_else(|| {
            EngineError::validation(format!("Unknown sub-status key: '{key}'"))
        })
    }

    /// Resolve a compile-time sub-status key. A missing catalog row here is
    /// a configuration error, not bad input.
    pub(crate) async fn resolve_known_sub_status(
        &self,
        key: SubStatusKey,
    ) -> EngineResult<StatusRecord> {
        StatusRepo::resolve_sub(&self.pool, key.as_str())
            .await?
            .ok_or_else(|| {
                EngineError::internal(format!(
                    "Status catalog is missing the '{key}' sub-status"
                ))
            })
    }

    pub(crate) async fn actor_name(&self, actor_id: Option<DbId>) -> Option<String> {
        match actor_id {
            Some(id) => self.identity.get_name(id).await,
            None => None,
        }
    }

    async fn load_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: DbId,
    ) -> EngineResult<Assignment> {
        AssignmentRepo::find_by_id_in_tx(tx, assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", assignment_id))
    }

    /// Catalog records for an assignment's current main and sub status.
    /// The catalog is append-only, so reading it outside the transaction is
    /// safe.
    async fn current_statuses(
        &self,
        assignment: &Assignment,
    ) -> EngineResult<(StatusRecord, StatusRecord)> {
        let main = StatusRepo::find_main_by_id(&self.pool, assignment.main_status_id)
            .await?
            .ok_or_else(|| {
                EngineError::internal(format!(
                    "Status catalog is missing main status id {}",
                    assignment.main_status_id
                ))
            })?;
        let sub = StatusRepo::find_sub_by_id(&self.pool, assignment.sub_status_id)
            .await?
            .ok_or_else(|| {
                EngineError::internal(format!(
                    "Status catalog is missing sub status id {}",
                    assignment.sub_status_id
                ))
            })?;
        Ok((main, sub))
    }

    async fn detail(&self, assignment_id: DbId) -> EngineResult<AssignmentDetail> {
        AssignmentRepo::find_detail_by_id(&self.pool, assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", assignment_id))
    }
}
