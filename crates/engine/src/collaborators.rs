//! External collaborator interfaces.
//!
//! The engine never performs file I/O or outbound delivery itself; it
//! consumes these contracts. Collaborator calls after a commit are
//! fire-and-forget: a failure is logged and never rolls back the
//! already-committed transition.

use async_trait::async_trait;
use sqlx::PgPool;
use talentflow_core::types::DbId;
use talentflow_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// A document instance owned by the external document store.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: DbId,
    pub document_type: String,
    pub status: String,
    pub file_ref: String,
}

/// Read access to the external document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id. `None` when the store has no such document.
    async fn get_document(&self, id: DbId) -> Option<DocumentRecord>;
}

// ---------------------------------------------------------------------------
// Notification sink
// ---------------------------------------------------------------------------

/// Outbound notification delivery (email/push live behind this).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        recipient_id: DbId,
        title: &str,
        body: &str,
        link: Option<&str>,
        metadata: serde_json::Value,
    ) -> anyhow::Result<()>;
}

/// Default sink that only emits a tracing event. Useful for tests and for
/// deployments without a delivery channel configured.
pub struct LoggingNotificationSink;

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn notify(
        &self,
        recipient_id: DbId,
        title: &str,
        _body: &str,
        link: Option<&str>,
        _metadata: serde_json::Value,
    ) -> anyhow::Result<()> {
        tracing::info!(recipient_id, title, link, "Notification dispatched");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identity lookup
// ---------------------------------------------------------------------------

/// Resolves actor ids to display names for history snapshots.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// A missing actor resolves to `None`, never an error.
    async fn get_name(&self, actor_id: DbId) -> Option<String>;
}

/// Identity lookup backed by the platform `users` table.
pub struct PgIdentityLookup {
    pool: PgPool,
}

impl PgIdentityLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityLookup for PgIdentityLookup {
    async fn get_name(&self, actor_id: DbId) -> Option<String> {
        match UserRepo::find_by_id(&self.pool, actor_id).await {
            Ok(user) => user.map(|u| u.full_name),
            Err(err) => {
                tracing::warn!(actor_id, error = %err, "Actor name lookup failed");
                None
            }
        }
    }
}
