//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use eventhub_core::types::{EventId, UserId};

use super::policy::EventCapacityPolicy;

/// Publication state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_state", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventState {
    /// Awaiting publication by an administrator.
    Pending,
    /// Visible and accepting participation requests.
    Published,
    /// Withdrawn.
    Canceled,
}

impl EventState {
    /// Return the state as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Published => "PUBLISHED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The slice of an event row the admission engine reads.
///
/// Title, description, location and the rest of the event metadata are
/// owned by the event-management collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// The user who created the event.
    pub initiator_id: UserId,
    /// Event title.
    pub title: String,
    /// Publication state.
    pub state: EventState,
    /// Maximum confirmed participants (0 = unlimited).
    pub participant_limit: i32,
    /// Whether requests need the initiator's approval.
    pub request_moderation: bool,
    /// When the event was published.
    pub published_on: Option<DateTime<Utc>>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event is accepting requests.
    pub fn is_published(&self) -> bool {
        self.state == EventState::Published
    }

    /// Whether the given user created this event.
    pub fn is_initiated_by(&self, user_id: UserId) -> bool {
        self.initiator_id == user_id
    }

    /// Derive the capacity policy the admission decider works from.
    pub fn capacity_policy(&self) -> EventCapacityPolicy {
        EventCapacityPolicy {
            participant_limit: self.participant_limit.max(0) as u32,
            moderation_required: self.request_moderation,
            state: self.state,
        }
    }
}
