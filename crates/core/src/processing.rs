//! Post-placement processing step catalog and status lifecycle.
//!
//! The step sequence is fixed and global: eleven ordered milestones every
//! placed assignment walks through, each with a default SLA allowance and a
//! flag for whether it may be marked not-applicable. Steps that file an
//! external application (visa, data-flow) additionally require a recorded
//! submission date before they can complete.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Step status lifecycle
// ---------------------------------------------------------------------------

/// Processing step status. Wire strings are persisted in history rows and
/// must be preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    Pending,
    InProgress,
    Done,
    Rejected,
    NotApplicable,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "PENDING",
            StepStatus::InProgress => "IN_PROGRESS",
            StepStatus::Done => "DONE",
            StepStatus::Rejected => "REJECTED",
            StepStatus::NotApplicable => "NOT_APPLICABLE",
        }
    }

    pub fn parse(s: &str) -> Option<StepStatus> {
        match s {
            "PENDING" => Some(StepStatus::Pending),
            "IN_PROGRESS" => Some(StepStatus::InProgress),
            "DONE" => Some(StepStatus::Done),
            "REJECTED" => Some(StepStatus::Rejected),
            "NOT_APPLICABLE" => Some(StepStatus::NotApplicable),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    ///
    /// REJECTED here means the step was cancelled (terminal with a recorded
    /// reason); it is not a retryable failure.
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Done | StepStatus::Rejected)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Step keys
// ---------------------------------------------------------------------------

/// The eleven fixed post-placement processing steps, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKey {
    MedicalCertificate,
    DocumentCollection,
    HrdAttestation,
    Qvp,
    DataFlow,
    Prometric,
    Visa,
    Immigration,
    Ticketing,
    Travel,
    Joining,
}

/// Catalog entry for one step key.
pub struct StepDefinition {
    pub key: StepKey,
    /// 1-based position in the fixed sequence.
    pub order: i16,
    /// Default SLA allowance in days, used to compute the due date.
    pub default_sla_days: i32,
    /// Whether the step may be marked NOT_APPLICABLE.
    pub allow_not_applicable: bool,
    /// Whether completion requires a recorded submission date.
    pub requires_submission_date: bool,
}

/// The fixed step catalog, matching the migration seed order.
pub const STEP_CATALOG: &[StepDefinition] = &[
    StepDefinition { key: StepKey::MedicalCertificate, order: 1, default_sla_days: 7, allow_not_applicable: false, requires_submission_date: false },
    StepDefinition { key: StepKey::DocumentCollection, order: 2, default_sla_days: 5, allow_not_applicable: false, requires_submission_date: false },
    StepDefinition { key: StepKey::HrdAttestation, order: 3, default_sla_days: 14, allow_not_applicable: true, requires_submission_date: false },
    StepDefinition { key: StepKey::Qvp, order: 4, default_sla_days: 10, allow_not_applicable: true, requires_submission_date: false },
    StepDefinition { key: StepKey::DataFlow, order: 5, default_sla_days: 21, allow_not_applicable: true, requires_submission_date: true },
    StepDefinition { key: StepKey::Prometric, order: 6, default_sla_days: 14, allow_not_applicable: true, requires_submission_date: false },
    StepDefinition { key: StepKey::Visa, order: 7, default_sla_days: 30, allow_not_applicable: false, requires_submission_date: true },
    StepDefinition { key: StepKey::Immigration, order: 8, default_sla_days: 10, allow_not_applicable: true, requires_submission_date: false },
    StepDefinition { key: StepKey::Ticketing, order: 9, default_sla_days: 5, allow_not_applicable: false, requires_submission_date: false },
    StepDefinition { key: StepKey::Travel, order: 10, default_sla_days: 3, allow_not_applicable: false, requires_submission_date: false },
    StepDefinition { key: StepKey::Joining, order: 11, default_sla_days: 2, allow_not_applicable: false, requires_submission_date: false },
];

impl StepKey {
    /// All step keys in pipeline order.
    pub const ALL: &'static [StepKey] = &[
        StepKey::MedicalCertificate,
        StepKey::DocumentCollection,
        StepKey::HrdAttestation,
        StepKey::Qvp,
        StepKey::DataFlow,
        StepKey::Prometric,
        StepKey::Visa,
        StepKey::Immigration,
        StepKey::Ticketing,
        StepKey::Travel,
        StepKey::Joining,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKey::MedicalCertificate => "medical_certificate",
            StepKey::DocumentCollection => "document_collection",
            StepKey::HrdAttestation => "hrd_attestation",
            StepKey::Qvp => "qvp",
            StepKey::DataFlow => "data_flow",
            StepKey::Prometric => "prometric",
            StepKey::Visa => "visa",
            StepKey::Immigration => "immigration",
            StepKey::Ticketing => "ticketing",
            StepKey::Travel => "travel",
            StepKey::Joining => "joining",
        }
    }

    pub fn parse(s: &str) -> Option<StepKey> {
        StepKey::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Catalog entry for this key.
    pub fn definition(self) -> &'static StepDefinition {
        // The catalog covers every variant; the lookup cannot miss.
        STEP_CATALOG
            .iter()
            .find(|d| d.key == self)
            .unwrap_or(&STEP_CATALOG[0])
    }

    pub fn order(self) -> i16 {
        self.definition().order
    }

    pub fn default_sla_days(self) -> i32 {
        self.definition().default_sla_days
    }

    pub fn allow_not_applicable(self) -> bool {
        self.definition().allow_not_applicable
    }

    pub fn requires_submission_date(self) -> bool {
        self.definition().requires_submission_date
    }
}

impl std::fmt::Display for StepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a caller-supplied step key, surfacing unknown keys as validation
/// failures.
pub fn parse_step_key(s: &str) -> Result<StepKey, CoreError> {
    StepKey::parse(s).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown processing step key: '{s}'. Valid keys: {}",
            StepKey::ALL
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}
