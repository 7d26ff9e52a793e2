//! Participation request creation, cancellation, and listing.

use std::sync::Arc;

use tracing::{debug, info};

use eventhub_core::error::{AppError, ConflictReason};
use eventhub_core::result::AppResult;
use eventhub_core::types::{EventId, PageRequest, PageResponse, RequestId, UserId};
use eventhub_database::StoreManager;
use eventhub_database::store::{EventDirectory, ParticipationStore, UserDirectory};
use eventhub_entity::request::{NewParticipationRequest, ParticipationRequest, RequestStatus};

use super::decider::AdmissionDecider;
use crate::retry::RetryPolicy;

/// Admits and cancels participation requests.
///
/// Every write runs inside a unit of work that holds the event's
/// exclusive lock, so the confirmed count read before deciding is still
/// current when the new request is persisted.
#[derive(Debug, Clone)]
pub struct RequestAdmissionService {
    /// Request store.
    requests: Arc<dyn ParticipationStore>,
    /// Event lookup.
    events: Arc<dyn EventDirectory>,
    /// User lookup.
    users: Arc<dyn UserDirectory>,
    /// Retry policy for aborted transactions.
    retry: RetryPolicy,
}

impl RequestAdmissionService {
    /// Creates a new admission service.
    pub fn new(stores: &StoreManager, retry: RetryPolicy) -> Self {
        Self {
            requests: Arc::clone(&stores.participation),
            events: Arc::clone(&stores.events),
            users: Arc::clone(&stores.users),
            retry,
        }
    }

    /// Creates a request from `requester_id` to join `event_id`.
    pub async fn add_request(
        &self,
        requester_id: UserId,
        event_id: EventId,
    ) -> AppResult<ParticipationRequest> {
        self.users.find_user(requester_id).await?;

        let request = self
            .retry
            .run("add_request", || self.try_add_request(requester_id, event_id))
            .await?;

        info!(
            request_id = %request.id,
            event_id = %event_id,
            requester_id = %requester_id,
            status = %request.status,
            "Participation request created"
        );
        Ok(request)
    }

    async fn try_add_request(
        &self,
        requester_id: UserId,
        event_id: EventId,
    ) -> AppResult<ParticipationRequest> {
        let mut uow = self.requests.lock_event(event_id).await?;

        if uow.find_live_request(requester_id).await?.is_some() {
            return Err(AppError::conflict(
                ConflictReason::DuplicateRequest,
                format!("User {requester_id} already has a request for event {event_id}"),
            ));
        }

        let event = uow.event();
        let policy = event.capacity_policy();
        let is_self_request = event.is_initiated_by(requester_id);
        let confirmed = uow.confirmed_count().await?;

        let status = AdmissionDecider::decide(&policy, confirmed, is_self_request).into_status()?;

        let request = uow
            .insert_request(NewParticipationRequest {
                event_id,
                requester_id,
                status,
            })
            .await?;
        uow.commit().await?;
        Ok(request)
    }

    /// Cancels one of the requester's own requests.
    pub async fn cancel_request(
        &self,
        requester_id: UserId,
        request_id: RequestId,
    ) -> AppResult<ParticipationRequest> {
        self.users.find_user(requester_id).await?;

        let request = self
            .requests
            .find_request(request_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Request with id={request_id} was not found"))
            })?;

        if request.requester_id != requester_id {
            return Err(AppError::conflict(
                ConflictReason::NotOwner,
                format!("User {requester_id} is not the requester of request {request_id}"),
            ));
        }

        let canceled = self
            .retry
            .run("cancel_request", || {
                self.try_cancel_request(request.event_id, request_id)
            })
            .await?;

        info!(
            request_id = %request_id,
            event_id = %canceled.event_id,
            requester_id = %requester_id,
            previous_status = %request.status,
            "Participation request canceled"
        );
        Ok(canceled)
    }

    async fn try_cancel_request(
        &self,
        event_id: EventId,
        request_id: RequestId,
    ) -> AppResult<ParticipationRequest> {
        let mut uow = self.requests.lock_event(event_id).await?;

        // Re-read under the lock: a moderator may have changed it meanwhile.
        let current = uow
            .find_requests(&[request_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::not_found(format!("Request with id={request_id} was not found"))
            })?;

        if !current.status.can_cancel() {
            return Err(AppError::conflict(
                ConflictReason::InvalidTransition,
                format!("Cannot cancel a request in status {}", current.status),
            ));
        }

        let canceled = uow
            .update_status(&[request_id], RequestStatus::Canceled)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Canceled request vanished inside transaction"))?;
        uow.commit().await?;
        Ok(canceled)
    }

    /// Lists the requester's requests, optionally for a single event.
    pub async fn list_requester_requests(
        &self,
        requester_id: UserId,
        event_id: Option<EventId>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ParticipationRequest>> {
        self.users.find_user(requester_id).await?;
        if let Some(event_id) = event_id {
            self.events.get_event(event_id).await?;
        }

        let page = self
            .requests
            .list_by_requester(requester_id, event_id, &page)
            .await?;
        debug!(
            requester_id = %requester_id,
            total = page.total_items,
            "Listed requester requests"
        );
        Ok(page)
    }

    /// Lists every request for an event. Only its initiator may do so.
    pub async fn list_event_requests(
        &self,
        owner_id: UserId,
        event_id: EventId,
    ) -> AppResult<Vec<ParticipationRequest>> {
        self.users.find_user(owner_id).await?;
        let event = self.events.get_event(event_id).await?;

        if !event.is_initiated_by(owner_id) {
            return Err(AppError::conflict(
                ConflictReason::NotOwner,
                format!("User {owner_id} is not the initiator of event {event_id}"),
            ));
        }

        self.requests.list_by_event(event_id).await
    }
}
