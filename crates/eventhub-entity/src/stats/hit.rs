//! Hit record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventhub_core::types::HitId;

/// One observed page view. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HitRecord {
    /// Unique hit identifier.
    pub id: HitId,
    /// Application that served the page.
    pub app: String,
    /// Viewed URI.
    pub uri: String,
    /// Client IP address.
    pub ip: String,
    /// When the view happened.
    pub timestamp: DateTime<Utc>,
}

/// Data required to append a hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHit {
    /// Application that served the page.
    pub app: String,
    /// Viewed URI.
    pub uri: String,
    /// Client IP address.
    pub ip: String,
    /// When the view happened.
    pub timestamp: DateTime<Utc>,
}
