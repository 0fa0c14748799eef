use crate::types::DbId;

/// Domain error taxonomy for the assignment pipeline.
///
/// Business-rule violations carry enough structured detail for a caller to
/// explain the failure to an end user (e.g. which mandatory documents are
/// still unverified). All variants map to 4xx-equivalent outcomes at an
/// HTTP boundary except [`CoreError::Internal`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested interview window overlaps an already-scheduled one.
    #[error("Slot conflict: overlaps interview {existing_interview_id} scheduled at {scheduled_at}")]
    SlotConflict {
        existing_interview_id: DbId,
        scheduled_at: crate::types::Timestamp,
    },

    /// The entity is in a terminal state and can no longer be mutated.
    #[error("{entity} is in terminal state '{status}' and cannot be modified")]
    TerminalState {
        entity: &'static str,
        status: String,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A completion gate is not satisfied.
    ///
    /// `missing_documents` holds the labels of mandatory documents without a
    /// verified verification; `submission_missing` is set when the step
    /// requires a submission date that has not been recorded.
    #[error("Completion gate not satisfied: {} missing document(s){}",
        missing_documents.len(),
        if *submission_missing { ", submission date missing" } else { "" })]
    GateNotSatisfied {
        missing_documents: Vec<String>,
        submission_missing: bool,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure with a formatted message.
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_error_message_lists_counts() {
        let err = CoreError::GateNotSatisfied {
            missing_documents: vec!["Passport".into(), "Medical Report".into()],
            submission_missing: true,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 missing document(s)"));
        assert!(msg.contains("submission date missing"));
    }

    #[test]
    fn gate_error_message_without_submission() {
        let err = CoreError::GateNotSatisfied {
            missing_documents: vec!["Passport".into()],
            submission_missing: false,
        };
        assert!(!err.to_string().contains("submission"));
    }

    #[test]
    fn terminal_state_names_entity_and_status() {
        let err = CoreError::TerminalState {
            entity: "ProcessingStep",
            status: "DONE".into(),
        };
        assert_eq!(
            err.to_string(),
            "ProcessingStep is in terminal state 'DONE' and cannot be modified"
        );
    }
}
