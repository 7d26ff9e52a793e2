//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use eventhub_core::types::{EventId, RequestId};
use eventhub_entity::request::ModerationAction;

/// `?eventId=` on request creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequestParams {
    /// The event to join.
    pub event_id: EventId,
}

/// Optional `?eventId=` filter on the requester's list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterRequestsParams {
    /// Restrict to one event.
    pub event_id: Option<EventId>,
}

/// Moderation batch body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    /// Requests to act on, in priority order.
    #[validate(length(max = 1000, message = "At most 1000 requests per batch"))]
    pub request_ids: Vec<RequestId>,
    /// `CONFIRMED` or `REJECTED`.
    pub status: ModerationAction,
}

/// Hit ingestion body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HitRequest {
    /// Application that served the page.
    #[validate(length(min = 1, max = 255, message = "app is required"))]
    pub app: String,
    /// Viewed URI.
    #[validate(length(min = 1, max = 512, message = "uri is required"))]
    pub uri: String,
    /// Client IP address.
    #[validate(length(min = 1, max = 64, message = "ip is required"))]
    pub ip: String,
    /// `yyyy-MM-dd HH:mm:ss`.
    #[validate(length(min = 1, message = "timestamp is required"))]
    pub timestamp: String,
}

/// `GET /stats` query. `uris` may repeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsQuery {
    /// Window start, `yyyy-MM-dd HH:mm:ss`.
    pub start: String,
    /// Window end, `yyyy-MM-dd HH:mm:ss`.
    pub end: String,
    /// URIs to restrict to.
    #[serde(default)]
    pub uris: Vec<String>,
    /// Count distinct IPs.
    #[serde(default)]
    pub unique: bool,
}

/// `GET /events/popularity` query. `ids` may repeat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopularityQuery {
    /// Events to enrich.
    #[serde(default)]
    pub ids: Vec<EventId>,
}
