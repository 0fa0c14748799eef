//! Talentflow assignment state-transition engine.
//!
//! The only place where the denormalized pipeline entities change together:
//! every state-changing operation runs inside one database transaction
//! covering the entity write plus its audit history append(s), with
//! stage-specific completion gates checked up front.
//!
//! - [`AssignmentStateMachine`] — the sole sanctioned mutation path for an
//!   assignment's main/sub status.
//! - [`InterviewSubWorkflow`] — scheduling, rescheduling, outcome updates,
//!   listings, and dashboard metrics for client interviews.
//! - [`ProcessingStepWorkflow`] — the fixed post-placement step sequence
//!   with per-step completion gates.
//! - [`GatingRuleEvaluator`] — side-effect-free gate evaluation.
//! - [`AuditTrailRecorder`] — append-only history writes, always inside the
//!   caller's transaction.
//! - [`bulk::run_each`] — batch fan-out with independent per-item outcomes.

pub mod audit;
pub mod bulk;
pub mod collaborators;
pub mod error;
pub mod gating;
pub mod interview;
pub mod processing;
pub mod state_machine;

pub use audit::AuditTrailRecorder;
pub use error::{EngineError, EngineResult};
pub use gating::GatingRuleEvaluator;
pub use interview::InterviewSubWorkflow;
pub use processing::{ProcessingStepWorkflow, VerifyOutcome};
pub use state_machine::AssignmentStateMachine;
