//! Response DTOs.

use serde::{Deserialize, Serialize};

use eventhub_core::types::{EventId, PageResponse, RequestId, UserId, format_stats_timestamp};
use eventhub_entity::request::{ParticipationRequest, RequestStatus};
use eventhub_service::{EventPopularity, ModerationOutcome};

/// A participation request as seen by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRequestDto {
    /// Request ID.
    pub id: RequestId,
    /// Event ID.
    pub event: EventId,
    /// Requester ID.
    pub requester: UserId,
    /// Current status.
    pub status: RequestStatus,
    /// Creation time, `yyyy-MM-dd HH:mm:ss`.
    pub created: String,
}

impl From<ParticipationRequest> for ParticipationRequestDto {
    fn from(request: ParticipationRequest) -> Self {
        Self {
            id: request.id,
            event: request.event_id,
            requester: request.requester_id,
            status: request.status,
            created: format_stats_timestamp(&request.created_at),
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total item count.
    pub total: u64,
    /// Current page.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total pages.
    pub total_pages: u64,
}

impl<T> From<PageResponse<T>> for PaginatedResponse<T> {
    fn from(page: PageResponse<T>) -> Self {
        Self {
            items: page.items,
            total: page.total_items,
            page: page.page,
            per_page: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

/// Result of a moderation batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResultDto {
    /// Requests now CONFIRMED.
    pub confirmed_requests: Vec<ParticipationRequestDto>,
    /// Requests now REJECTED, or left PENDING because the event is full.
    pub rejected_requests: Vec<ParticipationRequestDto>,
}

impl From<ModerationOutcome> for ModerationResultDto {
    fn from(outcome: ModerationOutcome) -> Self {
        Self {
            confirmed_requests: outcome.confirmed.into_iter().map(Into::into).collect(),
            rejected_requests: outcome.rejected.into_iter().map(Into::into).collect(),
        }
    }
}

/// Popularity figures for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPopularityDto {
    /// Event ID.
    pub event_id: EventId,
    /// Confirmed participants.
    pub confirmed_requests: u64,
    /// Unique views since publication.
    pub views: u64,
}

impl From<EventPopularity> for EventPopularityDto {
    fn from(p: EventPopularity) -> Self {
        Self {
            event_id: p.event_id,
            confirmed_requests: p.confirmed_requests,
            views: p.views,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend in use.
    pub backend: String,
    /// Whether the backend answered.
    pub database: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}
