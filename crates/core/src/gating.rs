//! Completion-gate evaluation for processing steps.
//!
//! Pure computation over already-fetched requirement/verification state, so
//! the engine can re-run it for UI polling without side effects. The
//! database-facing half (row fetching) lives in the engine crate.

use serde::Serialize;

use crate::processing::StepKey;

/// One mandatory-or-optional document requirement with its verification
/// state, as assembled by the data-access layer.
#[derive(Debug, Clone)]
pub struct RequirementState {
    pub label: String,
    pub mandatory: bool,
    /// A `verified` verification exists for this requirement.
    pub verified: bool,
}

/// Result of evaluating a step's completion gate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GateReport {
    /// Number of mandatory documents required for the step.
    pub total_required: usize,
    /// Number of mandatory documents with a verified verification.
    pub verified_count: usize,
    /// Mandatory documents still missing verification.
    pub missing_count: usize,
    /// Labels of the missing mandatory documents, in requirement order.
    pub missing_labels: Vec<String>,
    /// The step requires a recorded submission date.
    pub submission_required: bool,
    /// A submission date has been recorded.
    pub has_submission: bool,
}

impl GateReport {
    /// The step may be marked DONE.
    pub fn ready(&self) -> bool {
        self.missing_count == 0 && (!self.submission_required || self.has_submission)
    }
}

/// Evaluate the completion gate for `step_key`.
///
/// `document_gating_exempt` reflects the assignment-level
/// `is_sent_for_document_verification` flag: an exempt assignment waives the
/// document half of the gate entirely, but the submission-date rule still
/// applies.
pub fn evaluate_gate(
    step_key: StepKey,
    requirements: &[RequirementState],
    document_gating_exempt: bool,
    has_submission: bool,
) -> GateReport {
    let submission_required = step_key.requires_submission_date();

    if document_gating_exempt {
        return GateReport {
            total_required: 0,
            verified_count: 0,
            missing_count: 0,
            missing_labels: Vec::new(),
            submission_required,
            has_submission,
        };
    }

    let mandatory: Vec<&RequirementState> =
        requirements.iter().filter(|r| r.mandatory).collect();
    let verified_count = mandatory.iter().filter(|r| r.verified).count();
    let missing_labels: Vec<String> = mandatory
        .iter()
        .filter(|r| !r.verified)
        .map(|r| r.label.clone())
        .collect();

    GateReport {
        total_required: mandatory.len(),
        verified_count,
        missing_count: missing_labels.len(),
        missing_labels,
        submission_required,
        has_submission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(label: &str, mandatory: bool, verified: bool) -> RequirementState {
        RequirementState {
            label: label.into(),
            mandatory,
            verified,
        }
    }

    #[test]
    fn all_verified_is_ready() {
        let report = evaluate_gate(
            StepKey::MedicalCertificate,
            &[req("Medical Report", true, true), req("Passport", true, true)],
            false,
            false,
        );
        assert_eq!(report.total_required, 2);
        assert_eq!(report.verified_count, 2);
        assert_eq!(report.missing_count, 0);
        assert!(report.ready());
    }

    #[test]
    fn unverified_mandatory_blocks_with_labels() {
        let report = evaluate_gate(
            StepKey::MedicalCertificate,
            &[
                req("Medical Report", true, true),
                req("Passport", true, false),
                req("Vaccination Card", true, false),
            ],
            false,
            false,
        );
        assert!(!report.ready());
        assert_eq!(report.missing_count, 2);
        assert_eq!(report.missing_labels, vec!["Passport", "Vaccination Card"]);
    }

    #[test]
    fn optional_documents_ignored() {
        let report = evaluate_gate(
            StepKey::Prometric,
            &[req("Exam Result", true, true), req("Cover Letter", false, false)],
            false,
            false,
        );
        assert_eq!(report.total_required, 1);
        assert!(report.ready());
    }

    #[test]
    fn submission_required_blocks_until_recorded() {
        let reqs = [req("Visa Application Form", true, true)];
        let without = evaluate_gate(StepKey::Visa, &reqs, false, false);
        assert!(without.submission_required);
        assert!(!without.ready());

        let with = evaluate_gate(StepKey::Visa, &reqs, false, true);
        assert!(with.ready());
    }

    #[test]
    fn exempt_assignment_waives_documents_not_submission() {
        let reqs = [req("Visa Application Form", true, false)];
        let report = evaluate_gate(StepKey::Visa, &reqs, true, false);
        assert_eq!(report.missing_count, 0);
        assert!(report.missing_labels.is_empty());
        // Submission rule survives the exemption.
        assert!(!report.ready());

        let with_submission = evaluate_gate(StepKey::Visa, &reqs, true, true);
        assert!(with_submission.ready());
    }

    #[test]
    fn no_requirements_is_ready() {
        let report = evaluate_gate(StepKey::Travel, &[], false, false);
        assert_eq!(report.total_required, 0);
        assert!(report.ready());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let reqs = [req("Passport", true, true)];
        let a = evaluate_gate(StepKey::Visa, &reqs, false, true);
        let b = evaluate_gate(StepKey::Visa, &reqs, false, true);
        assert_eq!(a, b);
        assert!(a.ready() && b.ready());
    }
}
