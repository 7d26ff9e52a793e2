//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventhub_core::types::UserId;

/// A platform user as seen by the admission engine.
///
/// User management itself lives elsewhere; this core only needs to know
/// that the identity exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// When the user was registered.
    pub created_at: DateTime<Utc>,
}
