//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must participate in
//! a caller-owned transaction take `&mut Transaction` and carry an `_in_tx`
//! suffix.

pub mod assignment_history_repo;
pub mod assignment_repo;
pub mod document_repo;
pub mod interview_history_repo;
pub mod interview_repo;
pub mod processing_history_repo;
pub mod processing_step_repo;
pub mod status_repo;
pub mod user_repo;

pub use assignment_history_repo::AssignmentHistoryRepo;
pub use assignment_repo::AssignmentRepo;
pub use document_repo::{DocumentRequirementRepo, DocumentVerificationRepo};
pub use interview_history_repo::InterviewHistoryRepo;
pub use interview_repo::InterviewRepo;
pub use processing_history_repo::ProcessingHistoryRepo;
pub use processing_step_repo::ProcessingStepRepo;
pub use status_repo::StatusRepo;
pub use user_repo::UserRepo;
