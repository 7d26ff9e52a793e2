//! Request status and moderation action enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a participation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Waiting for the event initiator's decision.
    Pending,
    /// Holding a participant slot.
    Confirmed,
    /// Declined by the event initiator.
    Rejected,
    /// Withdrawn by the requester.
    Canceled,
}

impl RequestStatus {
    /// Whether the request still counts against the one-per-pair rule.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Canceled)
    }

    /// Whether the requester may cancel from this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the event initiator wants done with a batch of pending requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModerationAction {
    /// Move requests to CONFIRMED, up to the remaining capacity.
    #[serde(rename = "CONFIRMED", alias = "CONFIRM")]
    Confirm,
    /// Move requests to REJECTED.
    #[serde(rename = "REJECTED", alias = "REJECT")]
    Reject,
}

impl ModerationAction {
    /// The status requests end up in when this action applies.
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::Confirm => RequestStatus::Confirmed,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_boundary() {
        assert!(RequestStatus::Pending.can_cancel());
        assert!(RequestStatus::Confirmed.can_cancel());
        assert!(!RequestStatus::Rejected.can_cancel());
        assert!(!RequestStatus::Canceled.can_cancel());
    }

    #[test]
    fn test_live_statuses() {
        assert!(RequestStatus::Rejected.is_live());
        assert!(!RequestStatus::Canceled.is_live());
    }

    #[test]
    fn test_moderation_action_wire_names() {
        let action: ModerationAction = serde_json::from_str("\"CONFIRMED\"").expect("confirmed");
        assert_eq!(action, ModerationAction::Confirm);
        let action: ModerationAction = serde_json::from_str("\"REJECT\"").expect("alias");
        assert_eq!(action.target_status(), RequestStatus::Rejected);
    }
}
