use talentflow_core::error::CoreError;
use talentflow_core::types::DbId;

/// Engine-level error type.
///
/// Wraps [`CoreError`] for domain errors and adds persistence and input
/// validation failures. At an HTTP boundary `Core` variants map to their
/// 4xx-equivalents, `Invalid` to 400, and `Database` to 500 (except
/// `RowNotFound`).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `talentflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Input failed declarative validation.
    #[error("Validation failed")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Convenience type alias for engine operation results.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        EngineError::Core(CoreError::NotFound { entity, id })
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Core(CoreError::Validation(msg.into()))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Core(CoreError::Internal(msg.into()))
    }
}
