//! View aggregate models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregated hit count for one (app, uri) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ViewStats {
    /// Application name.
    pub app: String,
    /// Viewed URI.
    pub uri: String,
    /// Total hits, or distinct client IPs for unique queries.
    pub hits: i64,
}

/// Parameters of a view aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Inclusive window start.
    pub start: DateTime<Utc>,
    /// Inclusive window end.
    pub end: DateTime<Utc>,
    /// URIs to restrict to; empty means every URI.
    pub uris: Vec<String>,
    /// Count distinct IPs instead of raw hits.
    pub unique: bool,
    /// Restrict to hits recorded by this application.
    #[serde(default)]
    pub app: Option<String>,
}

impl ViewQuery {
    /// Whether the window is well-formed.
    pub fn is_valid_range(&self) -> bool {
        self.start <= self.end
    }

    /// Whether a hit by `app` at `timestamp` on `uri` falls inside this query.
    pub fn matches(&self, app: &str, uri: &str, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start
            && *timestamp <= self.end
            && self.app.as_deref().is_none_or(|a| a == app)
            && (self.uris.is_empty() || self.uris.iter().any(|u| u == uri))
    }
}
