//! Bulk confirmation and rejection of pending requests by the event owner.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use eventhub_core::error::{AppError, ConflictReason};
use eventhub_core::result::AppResult;
use eventhub_core::types::{EventId, RequestId, UserId};
use eventhub_database::StoreManager;
use eventhub_database::store::{EventUnitOfWork, ParticipationStore, UserDirectory};
use eventhub_entity::request::{ModerationAction, ParticipationRequest, RequestStatus};

use crate::retry::RetryPolicy;

/// Result of a moderation batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModerationOutcome {
    /// Requests that are now CONFIRMED, in caller order.
    pub confirmed: Vec<ParticipationRequest>,
    /// Requests that are now REJECTED, or that were left PENDING because
    /// the event filled up, in caller order.
    pub rejected: Vec<ParticipationRequest>,
}

impl ModerationOutcome {
    /// Whether the batch changed nothing.
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.rejected.is_empty()
    }
}

/// Applies moderator decisions to batches of pending requests.
#[derive(Debug, Clone)]
pub struct ModerationBatchProcessor {
    /// Request store.
    requests: Arc<dyn ParticipationStore>,
    /// User lookup.
    users: Arc<dyn UserDirectory>,
    /// Retry policy for aborted transactions.
    retry: RetryPolicy,
}

impl ModerationBatchProcessor {
    /// Creates a new moderation processor.
    pub fn new(stores: &StoreManager, retry: RetryPolicy) -> Self {
        Self {
            requests: Arc::clone(&stores.participation),
            users: Arc::clone(&stores.users),
            retry,
        }
    }

    /// Confirms or rejects `request_ids` for an event owned by `owner_id`.
    ///
    /// The batch is all-or-nothing: if any ID is unknown, belongs to another
    /// event, or is not PENDING, nothing changes. A confirmation batch is
    /// truncated to the event's remaining capacity and the excess stays
    /// PENDING.
    pub async fn update_status(
        &self,
        owner_id: UserId,
        event_id: EventId,
        request_ids: &[RequestId],
        action: ModerationAction,
    ) -> AppResult<ModerationOutcome> {
        self.users.find_user(owner_id).await?;

        let mut seen = HashSet::with_capacity(request_ids.len());
        let ids: Vec<RequestId> = request_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let outcome = self
            .retry
            .run("update_status", || self.try_update(owner_id, event_id, &ids, action))
            .await?;

        if !outcome.is_empty() {
            info!(
                event_id = %event_id,
                owner_id = %owner_id,
                action = ?action,
                confirmed = outcome.confirmed.len(),
                rejected = outcome.rejected.len(),
                "Moderation batch applied"
            );
        }
        Ok(outcome)
    }

    async fn try_update(
        &self,
        owner_id: UserId,
        event_id: EventId,
        ids: &[RequestId],
        action: ModerationAction,
    ) -> AppResult<ModerationOutcome> {
        let mut uow = self.requests.lock_event(event_id).await?;
        let event = uow.event();

        if !event.is_initiated_by(owner_id) {
            return Err(AppError::conflict(
                ConflictReason::NotOwner,
                format!("User {owner_id} is not the initiator of event {event_id}"),
            ));
        }

        let policy = event.capacity_policy();
        if !policy.is_moderated() || ids.is_empty() {
            return Ok(ModerationOutcome::default());
        }

        let pending = load_pending(&mut uow, event_id, ids).await?;

        let outcome = match action {
            ModerationAction::Reject => ModerationOutcome {
                confirmed: Vec::new(),
                rejected: uow.update_status(ids, action.target_status()).await?,
            },
            ModerationAction::Confirm => {
                let confirmed = uow.confirmed_count().await?;
                let remaining = policy.remaining(confirmed).unwrap_or(u64::MAX);
                if remaining == 0 {
                    return Err(AppError::conflict(
                        ConflictReason::CapacityExceeded,
                        format!("The participant limit of event {event_id} has been reached"),
                    ));
                }

                let take = usize::try_from(remaining).unwrap_or(usize::MAX).min(ids.len());
                ModerationOutcome {
                    confirmed: uow
                        .update_status(&ids[..take], action.target_status())
                        .await?,
                    rejected: pending.into_iter().skip(take).collect(),
                }
            }
        };

        uow.commit().await?;
        Ok(outcome)
    }
}

/// Load the batch and check that every request is PENDING for this event.
async fn load_pending(
    uow: &mut Box<dyn EventUnitOfWork>,
    event_id: EventId,
    ids: &[RequestId],
) -> AppResult<Vec<ParticipationRequest>> {
    let found = uow.find_requests(ids).await?;
    if found.len() != ids.len() {
        return Err(AppError::conflict(
            ConflictReason::InvalidState,
            format!("Some of the requests do not exist for event {event_id}"),
        ));
    }

    if let Some(bad) = found
        .iter()
        .find(|r| r.event_id != event_id || r.status != RequestStatus::Pending)
    {
        return Err(AppError::conflict(
            ConflictReason::InvalidState,
            format!(
                "Request {} must be PENDING for event {event_id}, found {}",
                bad.id, bad.status
            ),
        ));
    }

    Ok(found)
}
