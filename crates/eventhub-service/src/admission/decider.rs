//! Pure admission decision for a single participation request.

use eventhub_core::error::{AppError, ConflictReason};
use eventhub_entity::event::{EventCapacityPolicy, EventState};
use eventhub_entity::request::RequestStatus;

/// Outcome of [`AdmissionDecider::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Store the request as CONFIRMED.
    AutoConfirm,
    /// Store the request as PENDING; capacity is enforced on confirmation.
    Pending,
    /// Refuse the request.
    Reject(ConflictReason),
}

impl AdmissionDecision {
    /// The status to persist, or the conflict to raise.
    pub fn into_status(self) -> Result<RequestStatus, AppError> {
        match self {
            Self::AutoConfirm => Ok(RequestStatus::Confirmed),
            Self::Pending => Ok(RequestStatus::Pending),
            Self::Reject(reason) => Err(AppError::conflict(reason, reject_message(reason))),
        }
    }
}

fn reject_message(reason: ConflictReason) -> &'static str {
    match reason {
        ConflictReason::SelfRequest => "Initiator cannot request to participate in their own event",
        ConflictReason::EventNotPublished => "Cannot participate in an unpublished event",
        ConflictReason::CapacityExceeded => "The participant limit has been reached",
        _ => "Request cannot be admitted",
    }
}

/// Decides the initial status of a new request from the event's policy.
///
/// Duplicate detection needs the request store and is done by the caller
/// before the decider runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionDecider;

impl AdmissionDecider {
    /// Decide the fate of a request given the current confirmed count.
    pub fn decide(
        policy: &EventCapacityPolicy,
        current_confirmed: u64,
        is_self_request: bool,
    ) -> AdmissionDecision {
        if is_self_request {
            return AdmissionDecision::Reject(ConflictReason::SelfRequest);
        }
        if policy.state != EventState::Published {
            return AdmissionDecision::Reject(ConflictReason::EventNotPublished);
        }
        if policy.is_unlimited() {
            return AdmissionDecision::AutoConfirm;
        }
        if !policy.moderation_required {
            return if current_confirmed < u64::from(policy.participant_limit) {
                AdmissionDecision::AutoConfirm
            } else {
                AdmissionDecision::Reject(ConflictReason::CapacityExceeded)
            };
        }
        AdmissionDecision::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(limit: u32, moderation: bool, state: EventState) -> EventCapacityPolicy {
        EventCapacityPolicy {
            participant_limit: limit,
            moderation_required: moderation,
            state,
        }
    }

    #[test]
    fn test_self_request_is_rejected_first() {
        let p = policy(0, false, EventState::Pending);
        assert_eq!(
            AdmissionDecider::decide(&p, 0, true),
            AdmissionDecision::Reject(ConflictReason::SelfRequest)
        );
    }

    #[test]
    fn test_unpublished_event_is_rejected() {
        for state in [EventState::Pending, EventState::Canceled] {
            let p = policy(10, true, state);
            assert_eq!(
                AdmissionDecider::decide(&p, 0, false),
                AdmissionDecision::Reject(ConflictReason::EventNotPublished)
            );
        }
    }

    #[test]
    fn test_unlimited_auto_confirms_regardless_of_moderation() {
        for moderation in [true, false] {
            let p = policy(0, moderation, EventState::Published);
            assert_eq!(
                AdmissionDecider::decide(&p, 1_000, false),
                AdmissionDecision::AutoConfirm
            );
        }
    }

    #[test]
    fn test_unmoderated_limit_is_enforced() {
        let p = policy(2, false, EventState::Published);
        assert_eq!(AdmissionDecider::decide(&p, 1, false), AdmissionDecision::AutoConfirm);
        assert_eq!(
            AdmissionDecider::decide(&p, 2, false),
            AdmissionDecision::Reject(ConflictReason::CapacityExceeded)
        );
    }

    #[test]
    fn test_moderated_request_is_pending_even_when_full() {
        let p = policy(2, true, EventState::Published);
        assert_eq!(AdmissionDecider::decide(&p, 0, false), AdmissionDecision::Pending);
        assert_eq!(AdmissionDecider::decide(&p, 2, false), AdmissionDecision::Pending);
    }

    #[test]
    fn test_into_status() {
        assert_eq!(
            AdmissionDecision::AutoConfirm.into_status().unwrap(),
            RequestStatus::Confirmed
        );
        assert_eq!(
            AdmissionDecision::Pending.into_status().unwrap(),
            RequestStatus::Pending
        );
        let err = AdmissionDecision::Reject(ConflictReason::CapacityExceeded)
            .into_status()
            .unwrap_err();
        assert!(err.is_conflict(ConflictReason::CapacityExceeded));
    }
}
