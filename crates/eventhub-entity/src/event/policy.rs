//! Capacity policy derived from an event.

use serde::{Deserialize, Serialize};

use super::model::EventState;

/// The admission-relevant view of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCapacityPolicy {
    /// Maximum confirmed participants (0 = unlimited).
    pub participant_limit: u32,
    /// Whether requests need the initiator's approval.
    pub moderation_required: bool,
    /// Publication state.
    pub state: EventState,
}

impl EventCapacityPolicy {
    /// Whether the event has no participant limit.
    pub fn is_unlimited(&self) -> bool {
        self.participant_limit == 0
    }

    /// Whether the initiator has anything to moderate.
    ///
    /// Events without moderation or without a limit confirm requests on
    /// arrival, so a moderation batch against them is a no-op.
    pub fn is_moderated(&self) -> bool {
        self.moderation_required && !self.is_unlimited()
    }

    /// Slots left given the current confirmed count; `None` when unlimited.
    pub fn remaining(&self, confirmed: u64) -> Option<u64> {
        if self.is_unlimited() {
            None
        } else {
            Some(u64::from(self.participant_limit).saturating_sub(confirmed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(limit: u32, moderation: bool) -> EventCapacityPolicy {
        EventCapacityPolicy {
            participant_limit: limit,
            moderation_required: moderation,
            state: EventState::Published,
        }
    }

    #[test]
    fn test_remaining() {
        assert_eq!(policy(0, true).remaining(40), None);
        assert_eq!(policy(5, true).remaining(3), Some(2));
        assert_eq!(policy(5, true).remaining(7), Some(0));
    }

    #[test]
    fn test_is_moderated() {
        assert!(policy(3, true).is_moderated());
        assert!(!policy(0, true).is_moderated());
        assert!(!policy(3, false).is_moderated());
    }
}
