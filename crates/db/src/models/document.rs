//! Document requirement and verification models.

use serde::Serialize;
use sqlx::FromRow;
use talentflow_core::types::{DbId, Timestamp};

/// A row from the `document_requirements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentRequirement {
    pub id: DbId,
    pub step_key: String,
    pub document_type: String,
    pub label: String,
    pub mandatory: bool,
    /// NULL means the requirement applies to every role.
    pub role_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A row from the `document_verifications` table.
///
/// `document_id` refers to a document instance owned by the external
/// document store; no foreign key exists on purpose.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVerification {
    pub id: DbId,
    pub assignment_id: DbId,
    pub step_key: String,
    pub document_id: DbId,
    pub requirement_id: Option<DbId>,
    pub status: String,
    pub verified_by: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a verification.
#[derive(Debug, Clone)]
pub struct CreateDocumentVerification {
    pub assignment_id: DbId,
    pub step_key: String,
    pub document_id: DbId,
    pub requirement_id: Option<DbId>,
    pub status: String,
    pub verified_by: Option<DbId>,
    pub notes: Option<String>,
}

/// Verification status wire strings.
pub mod verification_status {
    pub const PENDING: &str = "pending";
    pub const VERIFIED: &str = "verified";
    pub const REJECTED: &str = "rejected";
}
