//! Repository for the `users` table.

use sqlx::PgPool;
use talentflow_core::types::DbId;

use crate::models::user::User;

const USER_COLUMNS: &str = "id, full_name, email, created_at";

/// Read access to platform users, used for actor-name snapshots.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
