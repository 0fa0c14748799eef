//! Post-placement processing step workflow.
//!
//! Drives the eleven fixed milestones of a placed assignment through their
//! status lifecycle, enforcing the completion gate on DONE and the
//! submission-date rules for application-filing steps. Every status change
//! appends a step history row inside the same transaction.

use std::sync::Arc;

use chrono::Duration;
use sqlx::{PgPool, Postgres, Transaction};

use talentflow_core::processing::{parse_step_key, StepKey, StepStatus, STEP_CATALOG};
use talentflow_core::types::{DbId, Timestamp};
use talentflow_core::CoreError;
use talentflow_db::models::document::{
    verification_status, CreateDocumentVerification, DocumentVerification,
};
use talentflow_db::models::processing::{ProcessingStep, ProcessingStepHistoryEntry};
use talentflow_db::repositories::{
    AssignmentRepo, DocumentRequirementRepo, DocumentVerificationRepo, ProcessingHistoryRepo,
    ProcessingStepRepo,
};

use crate::audit::AuditTrailRecorder;
use crate::collaborators::{DocumentStore, IdentityLookup};
use crate::error::{EngineError, EngineResult};
use crate::gating::GatingRuleEvaluator;

/// Result of [`ProcessingStepWorkflow::verify_document`].
///
/// `AlreadyInProcessing` is a signal, not an error: the document already has
/// a verification on this step, and the existing row is returned untouched.
#[derive(Debug)]
pub enum VerifyOutcome {
    Verified(DocumentVerification),
    AlreadyInProcessing(DocumentVerification),
}

/// Manages the fixed post-placement processing pipeline of an assignment.
#[derive(Clone)]
pub struct ProcessingStepWorkflow {
    pool: PgPool,
    gating: GatingRuleEvaluator,
    identity: Arc<dyn IdentityLookup>,
    documents: Arc<dyn DocumentStore>,
}

impl ProcessingStepWorkflow {
    pub fn new(
        pool: PgPool,
        identity: Arc<dyn IdentityLookup>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let gating = GatingRuleEvaluator::new(pool.clone());
        Self {
            pool,
            gating,
            identity,
            documents,
        }
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    /// Create all eleven steps PENDING with due dates derived from each
    /// step's default SLA. Idempotent: existing steps are left untouched and
    /// get no duplicate history row.
    pub async fn initialize_steps(
        &self,
        assignment_id: DbId,
    ) -> EngineResult<Vec<ProcessingStep>> {
        self.ensure_assignment(assignment_id).await?;
        let now = chrono::Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut created = 0usize;
        for def in STEP_CATALOG {
            let existing = ProcessingStepRepo::find_for_assignment_in_tx(
                &mut tx,
                assignment_id,
                def.key.as_str(),
            )
            .await?;
            if existing.is_some() {
                continue;
            }
            let due = now + Duration::days(def.default_sla_days as i64);
            let step = ProcessingStepRepo::create_in_tx(
                &mut tx,
                assignment_id,
                def.key.as_str(),
                def.default_sla_days,
                Some(due),
            )
            .await?;
            AuditTrailRecorder::record_step_change(
                &mut tx,
                step.id,
                None,
                StepStatus::Pending.as_str(),
                None,
                None,
                Some("Step initialized"),
            )
            .await?;
            created += 1;
        }
        tx.commit().await?;

        tracing::info!(assignment_id, created, "Processing steps initialized");
        self.list_steps(assignment_id).await
    }

    // -----------------------------------------------------------------------
    // Status lifecycle
    // -----------------------------------------------------------------------

    /// Change a step's status.
    ///
    /// Rules apply in order, first failure wins: a terminal step rejects any
    /// change; NOT_APPLICABLE requires the catalog to allow it; DONE
    /// requires the completion gate to be satisfied. A step touched before
    /// initialization is created on the fly.
    pub async fn update_step_status(
        &self,
        assignment_id: DbId,
        step_key: &str,
        new_status: &str,
        actor_id: Option<DbId>,
        notes: Option<&str>,
    ) -> EngineResult<ProcessingStep> {
        let key = parse_step_key(step_key)?;
        let target = StepStatus::parse(new_status).ok_or_else(|| {
            EngineError::validation(format!("Unknown step status: '{new_status}'"))
        })?;
        self.ensure_assignment(assignment_id).await?;

        // Rule order: terminal state first, then the NOT_APPLICABLE flag,
        // then the completion gate. Re-checked inside the transaction.
        if let Some(step) =
            ProcessingStepRepo::find_for_assignment(&self.pool, assignment_id, key.as_str()).await?
        {
            Self::ensure_not_terminal(&step)?;
        }

        if target == StepStatus::NotApplicable && !key.allow_not_applicable() {
            return Err(EngineError::Core(CoreError::InvalidTransition(format!(
                "Step '{key}' cannot be marked NOT_APPLICABLE"
            ))));
        }

        // The gate reads committed state only, so evaluate before the
        // transaction opens.
        if target == StepStatus::Done {
            let report = self.gating.evaluate(assignment_id, key).await?;
            if !report.ready() {
                return Err(EngineError::Core(CoreError::GateNotSatisfied {
                    missing_documents: report.missing_labels,
                    submission_missing: report.submission_required && !report.has_submission,
                }));
            }
        }

        let actor_name = self.actor_name(actor_id).await;
        let now = chrono::Utc::now();

        let mut tx = self.pool.begin().await?;
        let step = self.load_or_create_in_tx(&mut tx, assignment_id, key).await?;
        Self::ensure_not_terminal(&step)?;

        let started_at = (target == StepStatus::InProgress).then_some(now);
        let completed_at = (target == StepStatus::Done).then_some(now);
        let na_reason = (target == StepStatus::NotApplicable)
            .then_some(notes)
            .flatten();

        let updated = ProcessingStepRepo::update_status_in_tx(
            &mut tx,
            step.id,
            target.as_str(),
            notes,
            started_at,
            completed_at,
            na_reason,
        )
        .await?;

        AuditTrailRecorder::record_step_change(
            &mut tx,
            step.id,
            Some(&step.status),
            target.as_str(),
            actor_id,
            actor_name.as_deref(),
            notes,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            assignment_id,
            step_key = %key,
            status = %target,
            "Processing step status updated"
        );
        Ok(updated)
    }

    /// Cancel a step: terminal REJECTED with a recorded reason.
    pub async fn cancel_step(
        &self,
        assignment_id: DbId,
        step_key: &str,
        reason: &str,
        actor_id: Option<DbId>,
    ) -> EngineResult<ProcessingStep> {
        let key = parse_step_key(step_key)?;
        let step = self.load_step(assignment_id, key).await?;
        Self::ensure_not_terminal(&step)?;

        let actor_name = self.actor_name(actor_id).await;

        let mut tx = self.pool.begin().await?;
        let updated = ProcessingStepRepo::cancel_in_tx(
            &mut tx,
            step.id,
            StepStatus::Rejected.as_str(),
            reason,
        )
        .await?;
        AuditTrailRecorder::record_step_change(
            &mut tx,
            step.id,
            Some(&step.status),
            StepStatus::Rejected.as_str(),
            actor_id,
            actor_name.as_deref(),
            Some(reason),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(assignment_id, step_key = %key, "Processing step cancelled");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Submission dates
    // -----------------------------------------------------------------------

    /// Record a step's submission date. Set-once: a date already on file is
    /// a Conflict; corrections go through [`Self::edit_submit_date`].
    pub async fn submit_date(
        &self,
        assignment_id: DbId,
        step_key: &str,
        submitted_at: Timestamp,
        actor_id: Option<DbId>,
    ) -> EngineResult<ProcessingStep> {
        let key = parse_step_key(step_key)?;
        self.ensure_assignment(assignment_id).await?;
        let actor_name = self.actor_name(actor_id).await;

        let mut tx = self.pool.begin().await?;
        let step = self.load_or_create_in_tx(&mut tx, assignment_id, key).await?;
        Self::ensure_not_terminal(&step)?;
        if step.submitted_at.is_some() {
            return Err(EngineError::Core(CoreError::Conflict(format!(
                "Submission date already recorded for step '{key}'"
            ))));
        }

        let updated =
            ProcessingStepRepo::set_submitted_at_in_tx(&mut tx, step.id, submitted_at).await?;
        AuditTrailRecorder::record_step_change(
            &mut tx,
            step.id,
            Some(&step.status),
            &step.status,
            actor_id,
            actor_name.as_deref(),
            Some(&format!("Submission date recorded: {submitted_at}")),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(assignment_id, step_key = %key, %submitted_at, "Submission date recorded");
        Ok(updated)
    }

    /// Overwrite a step's submission date. Unbounded until the step reaches
    /// a terminal state; requires a date to already be on file.
    pub async fn edit_submit_date(
        &self,
        assignment_id: DbId,
        step_key: &str,
        submitted_at: Timestamp,
        actor_id: Option<DbId>,
    ) -> EngineResult<ProcessingStep> {
        let key = parse_step_key(step_key)?;
        let step = self.load_step(assignment_id, key).await?;
        Self::ensure_not_terminal(&step)?;
        if step.submitted_at.is_none() {
            return Err(EngineError::Core(CoreError::Conflict(format!(
                "No submission date to edit for step '{key}'"
            ))));
        }

        let actor_name = self.actor_name(actor_id).await;

        let mut tx = self.pool.begin().await?;
        let updated =
            ProcessingStepRepo::set_submitted_at_in_tx(&mut tx, step.id, submitted_at).await?;
        AuditTrailRecorder::record_step_change(
            &mut tx,
            step.id,
            Some(&step.status),
            &step.status,
            actor_id,
            actor_name.as_deref(),
            Some(&format!("Submission date updated: {submitted_at}")),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(assignment_id, step_key = %key, %submitted_at, "Submission date updated");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Document verification
    // -----------------------------------------------------------------------

    /// Record a `verified` verification for a document on a step.
    ///
    /// When the (assignment, step, document) triple already carries a
    /// verification, the existing row comes back as
    /// [`VerifyOutcome::AlreadyInProcessing`] and nothing is inserted.
    pub async fn verify_document(
        &self,
        assignment_id: DbId,
        document_id: DbId,
        step_key: &str,
        verified_by: Option<DbId>,
        notes: Option<&str>,
    ) -> EngineResult<VerifyOutcome> {
        let key = parse_step_key(step_key)?;
        let assignment = AssignmentRepo::find_by_id(&self.pool, assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", assignment_id))?;

        if let Some(existing) = DocumentVerificationRepo::find_for_document(
            &self.pool,
            assignment_id,
            key.as_str(),
            document_id,
        )
        .await?
        {
            tracing::debug!(
                assignment_id,
                document_id,
                step_key = %key,
                "Document already has a verification"
            );
            return Ok(VerifyOutcome::AlreadyInProcessing(existing));
        }

        let document = self
            .documents
            .get_document(document_id)
            .await
            .ok_or_else(|| EngineError::not_found("Document", document_id))?;

        // Match the document to a requirement so the gate can count it;
        // unmatched documents still get recorded, just without a
        // requirement link.
        let requirement = DocumentRequirementRepo::find_for_document_type(
            &self.pool,
            key.as_str(),
            &document.document_type,
            assignment.role_id,
        )
        .await?;

        let mut tx = self.pool.begin().await?;
        let verification = DocumentVerificationRepo::create_in_tx(
            &mut tx,
            &CreateDocumentVerification {
                assignment_id,
                step_key: key.as_str().to_owned(),
                document_id,
                requirement_id: requirement.as_ref().map(|r| r.id),
                status: verification_status::VERIFIED.to_owned(),
                verified_by,
                notes: notes.map(str::to_owned),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            assignment_id,
            document_id,
            step_key = %key,
            requirement_id = verification.requirement_id,
            "Document verified"
        );
        Ok(VerifyOutcome::Verified(verification))
    }

    // -----------------------------------------------------------------------
    // Read models
    // -----------------------------------------------------------------------

    /// List an assignment's steps in catalog (pipeline) order.
    pub async fn list_steps(&self, assignment_id: DbId) -> EngineResult<Vec<ProcessingStep>> {
        self.ensure_assignment(assignment_id).await?;
        let mut steps = ProcessingStepRepo::list_for_assignment(&self.pool, assignment_id).await?;
        steps.sort_by_key(|s| StepKey::parse(&s.step_key).map(StepKey::order).unwrap_or(i16::MAX));
        Ok(steps)
    }

    /// List a step's history, newest first.
    pub async fn step_history(
        &self,
        assignment_id: DbId,
        step_key: &str,
    ) -> EngineResult<Vec<ProcessingStepHistoryEntry>> {
        let key = parse_step_key(step_key)?;
        let step = self.load_step(assignment_id, key).await?;
        Ok(ProcessingHistoryRepo::list_for_step(&self.pool, step.id).await?)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn ensure_assignment(&self, assignment_id: DbId) -> EngineResult<()> {
        AssignmentRepo::find_by_id(&self.pool, assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", assignment_id))?;
        Ok(())
    }

    async fn load_step(
        &self,
        assignment_id: DbId,
        key: StepKey,
    ) -> EngineResult<ProcessingStep> {
        self.ensure_assignment(assignment_id).await?;
        ProcessingStepRepo::find_for_assignment(&self.pool, assignment_id, key.as_str())
            .await?
            .ok_or_else(|| {
                EngineError::validation(format!(
                    "Assignment {assignment_id} has no '{key}' step"
                ))
            })
    }

    /// Fetch a step inside the transaction, creating it PENDING with its
    /// default SLA when it was never initialized.
    async fn load_or_create_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: DbId,
        key: StepKey,
    ) -> EngineResult<ProcessingStep> {
        if let Some(step) =
            ProcessingStepRepo::find_for_assignment_in_tx(tx, assignment_id, key.as_str()).await?
        {
            return Ok(step);
        }
        let due = chrono::Utc::now() + Duration::days(key.default_sla_days() as i64);
        Ok(ProcessingStepRepo::create_in_tx(
            tx,
            assignment_id,
            key.as_str(),
            key.default_sla_days(),
            Some(due),
        )
        .await?)
    }

    fn ensure_not_terminal(step: &ProcessingStep) -> EngineResult<()> {
        let terminal = StepStatus::parse(&step.status)
            .map(StepStatus::is_terminal)
            .unwrap_or(false);
        if terminal {
            return Err(EngineError::Core(CoreError::TerminalState {
                entity: "ProcessingStep",
                status: step.status.clone(),
            }));
        }
        Ok(())
    }

    async fn actor_name(&self, actor_id: Option<DbId>) -> Option<String> {
        match actor_id {
            Some(id) => self.identity.get_name(id).await,
            None => None,
        }
    }
}
