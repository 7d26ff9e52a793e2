//! Store traits the service layer is written against.
//!
//! Every write to participation requests goes through an
//! [`EventUnitOfWork`], which holds the event's exclusive lock from
//! [`ParticipationStore::lock_event`] until it is committed or dropped.
//! Dropping a unit of work without committing discards its writes.
//!
//! Two implementations are provided:
//! - PostgreSQL (`SELECT … FOR UPDATE` on the event row, bounded by
//!   `lock_timeout`)
//! - In-memory (one `tokio::sync::Mutex` per event, bounded by
//!   `tokio::time::timeout`)

use std::collections::HashMap;

use async_trait::async_trait;

use eventhub_core::result::AppResult;
use eventhub_core::types::{EventId, PageRequest, PageResponse, RequestId, UserId};
use eventhub_entity::event::Event;
use eventhub_entity::request::{NewParticipationRequest, ParticipationRequest, RequestStatus};
use eventhub_entity::stats::{HitRecord, NewHit, ViewQuery, ViewStats};
use eventhub_entity::user::User;

/// Request persistence with per-event exclusive units of work.
#[async_trait]
pub trait ParticipationStore: Send + Sync + std::fmt::Debug {
    /// Open a unit of work holding the exclusive lock on `event_id`.
    ///
    /// Fails with `NotFound` if the event does not exist and with a
    /// retryable `TransactionConflict` if the lock is not acquired within
    /// the configured timeout.
    async fn lock_event(&self, event_id: EventId) -> AppResult<Box<dyn EventUnitOfWork>>;

    /// Find a request by ID outside of any unit of work.
    async fn find_request(&self, id: RequestId) -> AppResult<Option<ParticipationRequest>>;

    /// List a requester's requests, newest first, optionally for one event.
    async fn list_by_requester(
        &self,
        requester_id: UserId,
        event_id: Option<EventId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ParticipationRequest>>;

    /// List every request for an event in creation order.
    async fn list_by_event(&self, event_id: EventId) -> AppResult<Vec<ParticipationRequest>>;

    /// Count CONFIRMED requests per event in one grouped query.
    ///
    /// Events with no confirmed requests are absent from the map.
    async fn count_confirmed(&self, event_ids: &[EventId]) -> AppResult<HashMap<EventId, u64>>;
}

/// An open, event-scoped transaction.
#[async_trait]
pub trait EventUnitOfWork: Send {
    /// The locked event row, read inside the transaction.
    fn event(&self) -> &Event;

    /// Count CONFIRMED requests for the locked event, including writes
    /// staged in this unit of work.
    async fn confirmed_count(&mut self) -> AppResult<u64>;

    /// Find the requester's non-canceled request for the locked event.
    async fn find_live_request(
        &mut self,
        requester_id: UserId,
    ) -> AppResult<Option<ParticipationRequest>>;

    /// Load requests by ID. Missing IDs are skipped; order follows `ids`.
    async fn find_requests(&mut self, ids: &[RequestId]) -> AppResult<Vec<ParticipationRequest>>;

    /// Insert a new request for the locked event.
    async fn insert_request(
        &mut self,
        request: NewParticipationRequest,
    ) -> AppResult<ParticipationRequest>;

    /// Set the status of the given requests. Order of the result follows `ids`.
    async fn update_status(
        &mut self,
        ids: &[RequestId],
        status: RequestStatus,
    ) -> AppResult<Vec<ParticipationRequest>>;

    /// Make every write of this unit of work visible and release the lock.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Event lookup exposed by the event-management collaborator.
#[async_trait]
pub trait EventDirectory: Send + Sync + std::fmt::Debug {
    /// Get an event, failing with `NotFound` if it does not exist.
    async fn get_event(&self, id: EventId) -> AppResult<Event>;

    /// Load several events at once. Missing IDs are skipped.
    async fn find_events(&self, ids: &[EventId]) -> AppResult<Vec<Event>>;
}

/// User lookup exposed by the user-management collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    /// Find a user, failing with `NotFound` if they do not exist.
    async fn find_user(&self, id: UserId) -> AppResult<User>;
}

/// Append-only hit storage and its aggregate query.
#[async_trait]
pub trait HitStore: Send + Sync + std::fmt::Debug {
    /// Append one hit.
    async fn append(&self, hit: NewHit) -> AppResult<HitRecord>;

    /// Aggregate hits per (app, uri), most viewed first.
    ///
    /// The caller validates the range; groups with no hits are absent.
    async fn aggregate(&self, query: &ViewQuery) -> AppResult<Vec<ViewStats>>;
}
