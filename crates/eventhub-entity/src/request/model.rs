//! Participation request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventhub_core::types::{EventId, RequestId, UserId};

use super::status::RequestStatus;

/// A user's request to participate in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParticipationRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The event the user wants to join.
    pub event_id: EventId,
    /// The user asking to participate.
    pub requester_id: UserId,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new participation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipationRequest {
    /// The event the user wants to join.
    pub event_id: EventId,
    /// The user asking to participate.
    pub requester_id: UserId,
    /// Initial status decided by admission.
    pub status: RequestStatus,
}

/// One row of the grouped confirmed-count aggregate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct ConfirmedCount {
    /// The event.
    pub event_id: EventId,
    /// Number of CONFIRMED requests.
    pub confirmed: i64,
}
