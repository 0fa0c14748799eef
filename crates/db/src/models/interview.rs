//! Interview models, history, and the interview list read model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentflow_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `interviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interview {
    pub id: DbId,
    pub assignment_id: Option<DbId>,
    pub project_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub interview_type: String,
    pub mode: String,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    /// NULL means "pending".
    pub outcome: Option<String>,
    pub scheduled_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling a new interview.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleInterview {
    pub assignment_id: DbId,
    pub scheduled_at: Timestamp,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: i32,
    #[validate(length(min = 1))]
    pub interview_type: String,
    pub mode: String,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
}

/// A row from the append-only `interview_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterviewStatusHistoryEntry {
    pub id: DbId,
    pub interview_id: DbId,
    pub status: String,
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// Normalized read model for interview listings: interview fields plus the
/// related candidate/project/role and current assignment sub-status, plus
/// the derived `expired` flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterviewListItem {
    pub id: DbId,
    pub assignment_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub interview_type: String,
    pub mode: String,
    pub meeting_link: Option<String>,
    pub outcome: Option<String>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub project_title: String,
    pub role_name: String,
    pub sub_status_name: String,
    pub sub_status_label: String,
    /// `scheduled_at < now` at query time.
    pub expired: bool,
}

/// Filters for interview list queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewListFilters {
    /// Case-insensitive substring match across candidate name/email,
    /// project title, and role name.
    pub search: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    /// 1-based page number; defaults to 1.
    pub page: Option<i64>,
    /// Page size; defaults to 20.
    pub per_page: Option<i64>,
}

impl InterviewListFilters {
    pub const DEFAULT_PER_PAGE: i64 = 20;

    /// LIMIT/OFFSET pair for the query.
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1) * per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pagination() {
        let f = InterviewListFilters::default();
        assert_eq!(f.limit_offset(), (20, 0));
    }

    #[test]
    fn page_three_offsets_by_two_pages() {
        let f = InterviewListFilters {
            page: Some(3),
            per_page: Some(10),
            ..Default::default()
        };
        assert_eq!(f.limit_offset(), (10, 20));
    }

    #[test]
    fn out_of_range_values_clamped() {
        let f = InterviewListFilters {
            page: Some(0),
            per_page: Some(1000),
            ..Default::default()
        };
        assert_eq!(f.limit_offset(), (100, 0));
    }
}
