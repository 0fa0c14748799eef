//! Database-facing half of completion-gate evaluation.
//!
//! Fetches the requirement/verification/step rows and delegates to the pure
//! computation in `talentflow_core::gating`. Read-only and deterministic,
//! so UI polling can call it repeatedly without risk.

use std::collections::HashSet;

use sqlx::PgPool;
use talentflow_core::gating::{evaluate_gate, GateReport, RequirementState};
use talentflow_core::processing::StepKey;
use talentflow_core::types::DbId;
use talentflow_db::repositories::{
    AssignmentRepo, DocumentRequirementRepo, DocumentVerificationRepo, ProcessingStepRepo,
};

use crate::error::{EngineError, EngineResult};

/// Evaluates whether a processing step's completion gate is satisfied.
#[derive(Clone)]
pub struct GatingRuleEvaluator {
    pool: PgPool,
}

impl GatingRuleEvaluator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Evaluate the gate for one step of an assignment.
    pub async fn evaluate(
        &self,
        assignment_id: DbId,
        step_key: StepKey,
    ) -> EngineResult<GateReport> {
        let assignment = AssignmentRepo::find_by_id(&self.pool, assignment_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Assignment", assignment_id))?;

        let requirements = DocumentRequirementRepo::list_for_step(
            &self.pool,
            step_key.as_str(),
            assignment.role_id,
        )
        .await?;

        let verified: HashSet<DbId> = DocumentVerificationRepo::list_verified_for_step(
            &self.pool,
            assignment_id,
            step_key.as_str(),
        )
        .await?
        .into_iter()
        .filter_map(|v| v.requirement_id)
        .collect();

        let states: Vec<RequirementState> = requirements
            .into_iter()
            .map(|r| RequirementState {
                verified: verified.contains(&r.id),
                label: r.label,
                mandatory: r.mandatory,
            })
            .collect();

        let has_submission =
            ProcessingStepRepo::find_for_assignment(&self.pool, assignment_id, step_key.as_str())
                .await?
                .and_then(|s| s.submitted_at)
                .is_some();

        Ok(evaluate_gate(
            step_key,
            &states,
            assignment.is_sent_for_document_verification,
            has_submission,
        ))
    }
}
