//! In-memory backend with per-event exclusive locks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, warn};

use eventhub_core::error::{AppError, ConflictReason};
use eventhub_core::result::AppResult;
use eventhub_core::types::{EventId, HitId, PageRequest, PageResponse, RequestId, UserId};
use eventhub_entity::event::{Event, EventState};
use eventhub_entity::request::{NewParticipationRequest, ParticipationRequest, RequestStatus};
use eventhub_entity::stats::{HitRecord, NewHit, ViewQuery, ViewStats};
use eventhub_entity::user::User;

use crate::store::{EventDirectory, EventUnitOfWork, HitStore, ParticipationStore, UserDirectory};

/// Lock table size above which idle per-event locks are dropped.
const LOCK_PRUNE_THRESHOLD: usize = 1024;

/// Committed rows.
#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    requests: HashMap<RequestId, ParticipationRequest>,
    hits: Vec<HitRecord>,
}

/// In-memory implementation of every store trait.
///
/// Writes to an event's requests are serialized through one
/// `tokio::sync::Mutex` per event, which plays the role of the row lock
/// taken by the PostgreSQL backend. Locks nobody holds or waits on are
/// pruned once the table grows past a fixed size. Suitable for single-node
/// deployments and tests.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    event_locks: Arc<DashMap<EventId, Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            event_locks: Arc::new(DashMap::new()),
            lock_timeout,
        }
    }

    /// Register a user.
    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Register an event.
    pub async fn insert_event(&self, event: Event) {
        self.state.write().await.events.insert(event.id, event);
    }

    /// Change an event's publication state, as the event-management
    /// collaborator would.
    pub async fn set_event_state(
        &self,
        id: EventId,
        state: EventState,
        published_on: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let mut guard = self.state.write().await;
        let event = guard
            .events
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Event with id={id} was not found")))?;
        event.state = state;
        event.published_on = published_on;
        Ok(())
    }

    fn event_lock(&self, event_id: EventId) -> Arc<Mutex<()>> {
        // The map entry guard must not be held across an await.
        let lock = self.event_locks.entry(event_id).or_default().clone();
        if self.event_locks.len() > LOCK_PRUNE_THRESHOLD {
            self.event_locks.retain(|_, l| Arc::strong_count(l) > 1);
        }
        lock
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl ParticipationStore for MemoryStore {
    async fn lock_event(&self, event_id: EventId) -> AppResult<Box<dyn EventUnitOfWork>> {
        if !self.state.read().await.events.contains_key(&event_id) {
            return Err(AppError::not_found(format!(
                "Event with id={event_id} was not found"
            )));
        }

        let lock = self.event_lock(event_id);
        let guard = tokio::time::timeout(self.lock_timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                warn!(event_id = %event_id, timeout_ms = self.lock_timeout.as_millis() as u64, "Event lock timed out");
                AppError::transaction_conflict(format!(
                    "Timed out waiting for the lock on event {event_id}"
                ))
            })?;

        let event = self
            .state
            .read()
            .await
            .events
            .get(&event_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Event with id={event_id} was not found")))?;

        debug!(event_id = %event_id, "Event lock acquired");
        Ok(Box::new(MemoryUnitOfWork {
            _guard: guard,
            state: Arc::clone(&self.state),
            event,
            staged: HashMap::new(),
            staged_order: Vec::new(),
        }))
    }

    async fn find_request(&self, id: RequestId) -> AppResult<Option<ParticipationRequest>> {
        Ok(self.state.read().await.requests.get(&id).cloned())
    }

    async fn list_by_requester(
        &self,
        requester_id: UserId,
        event_id: Option<EventId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ParticipationRequest>> {
        let state = self.state.read().await;
        let mut matching: Vec<ParticipationRequest> = state
            .requests
            .values()
            .filter(|r| r.requester_id == requester_id)
            .filter(|r| event_id.is_none_or(|id| r.event_id == id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn list_by_event(&self, event_id: EventId) -> AppResult<Vec<ParticipationRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<ParticipationRequest> = state
            .requests
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(requests)
    }

    async fn count_confirmed(&self, event_ids: &[EventId]) -> AppResult<HashMap<EventId, u64>> {
        let wanted: HashSet<&EventId> = event_ids.iter().collect();
        let state = self.state.read().await;
        let mut counts = HashMap::new();
        for request in state.requests.values() {
            if request.status == RequestStatus::Confirmed && wanted.contains(&request.event_id) {
                *counts.entry(request.event_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

/// Unit of work over the in-memory state.
///
/// Writes are staged locally and applied on commit; dropping the unit of
/// work discards them and releases the event lock.
struct MemoryUnitOfWork {
    _guard: OwnedMutexGuard<()>,
    state: Arc<RwLock<MemoryState>>,
    event: Event,
    staged: HashMap<RequestId, ParticipationRequest>,
    staged_order: Vec<RequestId>,
}

impl MemoryUnitOfWork {
    /// The event's requests as this unit of work sees them.
    async fn visible_requests(&self) -> Vec<ParticipationRequest> {
        let state = self.state.read().await;
        let mut visible: Vec<ParticipationRequest> = state
            .requests
            .values()
            .filter(|r| r.event_id == self.event.id && !self.staged.contains_key(&r.id))
            .cloned()
            .collect();
        visible.extend(self.staged.values().cloned());
        visible
    }

    async fn lookup(&self, id: &RequestId) -> Option<ParticipationRequest> {
        if let Some(request) = self.staged.get(id) {
            return Some(request.clone());
        }
        self.state.read().await.requests.get(id).cloned()
    }

    fn stage(&mut self, request: ParticipationRequest) {
        if !self.staged.contains_key(&request.id) {
            self.staged_order.push(request.id);
        }
        self.staged.insert(request.id, request);
    }
}

#[async_trait]
impl EventUnitOfWork for MemoryUnitOfWork {
    fn event(&self) -> &Event {
        &self.event
    }

    async fn confirmed_count(&mut self) -> AppResult<u64> {
        Ok(self
            .visible_requests()
            .await
            .iter()
            .filter(|r| r.status == RequestStatus::Confirmed)
            .count() as u64)
    }

    async fn find_live_request(
        &mut self,
        requester_id: UserId,
    ) -> AppResult<Option<ParticipationRequest>> {
        Ok(self
            .visible_requests()
            .await
            .into_iter()
            .find(|r| r.requester_id == requester_id && r.status.is_live()))
    }

    async fn find_requests(&mut self, ids: &[RequestId]) -> AppResult<Vec<ParticipationRequest>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(request) = self.lookup(id).await {
                found.push(request);
            }
        }
        Ok(found)
    }

    async fn insert_request(
        &mut self,
        request: NewParticipationRequest,
    ) -> AppResult<ParticipationRequest> {
        if self.find_live_request(request.requester_id).await?.is_some() {
            return Err(AppError::conflict(
                ConflictReason::DuplicateRequest,
                "Request already exists",
            ));
        }

        let created = ParticipationRequest {
            id: RequestId::new(),
            event_id: request.event_id,
            requester_id: request.requester_id,
            status: request.status,
            created_at: Utc::now(),
        };
        self.stage(created.clone());
        Ok(created)
    }

    async fn update_status(
        &mut self,
        ids: &[RequestId],
        status: RequestStatus,
    ) -> AppResult<Vec<ParticipationRequest>> {
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(mut request) = self.lookup(id).await {
                request.status = status;
                self.stage(request.clone());
                updated.push(request);
            }
        }
        Ok(updated)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self {
            _guard,
            state,
            event,
            mut staged,
            staged_order,
        } = *self;

        let mut state = state.write().await;
        for id in staged_order {
            if let Some(request) = staged.remove(&id) {
                state.requests.insert(id, request);
            }
        }
        drop(state);

        debug!(event_id = %event.id, "Event unit of work committed");
        Ok(())
    }
}

#[async_trait]
impl EventDirectory for MemoryStore {
    async fn get_event(&self, id: EventId) -> AppResult<Event> {
        self.state
            .read()
            .await
            .events
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Event with id={id} was not found")))
    }

    async fn find_events(&self, ids: &[EventId]) -> AppResult<Vec<Event>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.events.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, id: UserId) -> AppResult<User> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User with id={id} was not found")))
    }
}

#[async_trait]
impl HitStore for MemoryStore {
    async fn append(&self, hit: NewHit) -> AppResult<HitRecord> {
        let record = HitRecord {
            id: HitId::new(),
            app: hit.app,
            uri: hit.uri,
            ip: hit.ip,
            timestamp: hit.timestamp,
        };
        self.state.write().await.hits.push(record.clone());
        Ok(record)
    }

    async fn aggregate(&self, query: &ViewQuery) -> AppResult<Vec<ViewStats>> {
        let state = self.state.read().await;

        let mut groups: HashMap<(&str, &str), (i64, HashSet<&str>)> = HashMap::new();
        for hit in state
            .hits
            .iter()
            .filter(|h| query.matches(&h.app, &h.uri, &h.timestamp))
        {
            let group = groups
                .entry((hit.app.as_str(), hit.uri.as_str()))
                .or_default();
            group.0 += 1;
            group.1.insert(hit.ip.as_str());
        }

        let mut stats: Vec<ViewStats> = groups
            .into_iter()
            .map(|((app, uri), (total, ips))| ViewStats {
                app: app.to_string(),
                uri: uri.to_string(),
                hits: if query.unique { ips.len() as i64 } else { total },
            })
            .collect();
        stats.sort_by(|a, b| {
            b.hits
                .cmp(&a.hits)
                .then_with(|| a.app.cmp(&b.app))
                .then_with(|| a.uri.cmp(&b.uri))
        });
        Ok(stats)
    }
}
