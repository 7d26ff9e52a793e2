//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::UserId;
use eventhub_entity::user::User;

use crate::error::map_sqlx;
use crate::store::UserDirectory;

/// Read-only access to the users table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_user(&self, id: UserId) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find user"))?
            .ok_or_else(|| AppError::not_found(format!("User with id={id} was not found")))
    }
}
