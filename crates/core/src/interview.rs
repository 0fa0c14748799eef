//! Interview vocabulary, slot arithmetic, and meeting-link generation.

use chrono::Duration;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Outcome vocabulary
// ---------------------------------------------------------------------------

/// Interview outcome. A NULL outcome column means "pending".
///
/// Wire strings are persisted and must be preserved exactly, including the
/// hyphenated `no-show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewOutcome {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
    Passed,
    Failed,
    NoShow,
}

impl InterviewOutcome {
    pub const ALL: &'static [InterviewOutcome] = &[
        InterviewOutcome::Scheduled,
        InterviewOutcome::Completed,
        InterviewOutcome::Cancelled,
        InterviewOutcome::Rescheduled,
        InterviewOutcome::Passed,
        InterviewOutcome::Failed,
        InterviewOutcome::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewOutcome::Scheduled => "scheduled",
            InterviewOutcome::Completed => "completed",
            InterviewOutcome::Cancelled => "cancelled",
            InterviewOutcome::Rescheduled => "rescheduled",
            InterviewOutcome::Passed => "passed",
            InterviewOutcome::Failed => "failed",
            InterviewOutcome::NoShow => "no-show",
        }
    }

    pub fn parse(s: &str) -> Option<InterviewOutcome> {
        InterviewOutcome::ALL.iter().copied().find(|o| o.as_str() == s)
    }
}

impl std::fmt::Display for InterviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interview delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewMode {
    Video,
    Phone,
    Onsite,
}

impl InterviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewMode::Video => "video",
            InterviewMode::Phone => "phone",
            InterviewMode::Onsite => "onsite",
        }
    }

    pub fn parse(s: &str) -> Option<InterviewMode> {
        match s {
            "video" => Some(InterviewMode::Video),
            "phone" => Some(InterviewMode::Phone),
            "onsite" => Some(InterviewMode::Onsite),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Slot arithmetic
// ---------------------------------------------------------------------------

/// Returns `true` when the half-open windows `[a_start, a_start+a_minutes)`
/// and `[b_start, b_start+b_minutes)` overlap.
///
/// Windows that merely touch (one ends exactly where the other begins) do
/// not overlap.
pub fn windows_overlap(
    a_start: Timestamp,
    a_minutes: i32,
    b_start: Timestamp,
    b_minutes: i32,
) -> bool {
    let a_end = a_start + Duration::minutes(a_minutes as i64);
    let b_end = b_start + Duration::minutes(b_minutes as i64);
    a_start < b_end && b_start < a_end
}

// ---------------------------------------------------------------------------
// Meeting links
// ---------------------------------------------------------------------------

/// Length of the opaque room token in a generated meeting link.
pub const MEETING_TOKEN_LENGTH: usize = 24;

/// Base URL for auto-generated video meeting rooms.
pub const MEETING_BASE_URL: &str = "https://meet.talentflow.app";

/// Generate a collision-resistant meeting link for a video interview.
///
/// Used when the scheduler supplies no link of their own.
pub fn generate_meeting_link() -> String {
    use rand::Rng;

    let token: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(MEETING_TOKEN_LENGTH)
        .map(char::from)
        .collect();

    format!("{MEETING_BASE_URL}/{token}")
}
