//! Participation request repository implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::{EventId, PageRequest, PageResponse, RequestId, UserId};
use eventhub_entity::event::Event;
use eventhub_entity::request::{
    ConfirmedCount, NewParticipationRequest, ParticipationRequest, RequestStatus,
};

use crate::error::map_sqlx;
use crate::store::{EventUnitOfWork, ParticipationStore};

const REQUEST_COLUMNS: &str = "id, event_id, requester_id, status, created_at";

/// PostgreSQL-backed participation request store.
#[derive(Debug, Clone)]
pub struct ParticipationRequestRepository {
    pool: PgPool,
    lock_timeout: Duration,
}

impl ParticipationRequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

#[async_trait]
impl ParticipationStore for ParticipationRequestRepository {
    async fn lock_event(&self, event_id: EventId) -> AppResult<Box<dyn EventUnitOfWork>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_sqlx("Failed to begin transaction"))?;

        // SET does not take bind parameters.
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout.as_millis()
        ))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx("Failed to set lock timeout"))?;

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx("Failed to lock event"))?
            .ok_or_else(|| AppError::not_found(format!("Event with id={event_id} was not found")))?;

        debug!(event_id = %event_id, "Event row locked");
        Ok(Box::new(PgEventUnitOfWork { tx, event }))
    }

    async fn find_request(&self, id: RequestId) -> AppResult<Option<ParticipationRequest>> {
        sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx("Failed to find request"))
    }

    async fn list_by_requester(
        &self,
        requester_id: UserId,
        event_id: Option<EventId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ParticipationRequest>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM participation_requests \
             WHERE requester_id = $1 AND ($2::uuid IS NULL OR event_id = $2)",
        )
        .bind(requester_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx("Failed to count requests"))?;

        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE requester_id = $1 AND ($2::uuid IS NULL OR event_id = $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(requester_id)
        .bind(event_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx("Failed to list requests"))?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_by_event(&self, event_id: EventId) -> AppResult<Vec<ParticipationRequest>> {
        sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE event_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx("Failed to list event requests"))
    }

    async fn count_confirmed(&self, event_ids: &[EventId]) -> AppResult<HashMap<EventId, u64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ConfirmedCount>(
            "SELECT event_id, COUNT(*) AS confirmed FROM participation_requests \
             WHERE event_id = ANY($1) AND status = 'confirmed' GROUP BY event_id",
        )
        .bind(event_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx("Failed to count confirmed requests"))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.event_id, row.confirmed.max(0) as u64))
            .collect())
    }
}

/// Open transaction holding `FOR UPDATE` on one event row.
///
/// Dropping it without [`EventUnitOfWork::commit`] rolls the transaction
/// back.
pub struct PgEventUnitOfWork {
    tx: Transaction<'static, Postgres>,
    event: Event,
}

#[async_trait]
impl EventUnitOfWork for PgEventUnitOfWork {
    fn event(&self) -> &Event {
        &self.event
    }

    async fn confirmed_count(&mut self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM participation_requests \
             WHERE event_id = $1 AND status = 'confirmed'",
        )
        .bind(self.event.id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx("Failed to count confirmed requests"))?;
        Ok(count.max(0) as u64)
    }

    async fn find_live_request(
        &mut self,
        requester_id: UserId,
    ) -> AppResult<Option<ParticipationRequest>> {
        sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE event_id = $1 AND requester_id = $2 AND status <> 'canceled'"
        ))
        .bind(self.event.id)
        .bind(requester_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx("Failed to find live request"))
    }

    async fn find_requests(&mut self, ids: &[RequestId]) -> AppResult<Vec<ParticipationRequest>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx("Failed to load requests"))?;

        Ok(in_input_order(ids, rows))
    }

    async fn insert_request(
        &mut self,
        request: NewParticipationRequest,
    ) -> AppResult<ParticipationRequest> {
        sqlx::query_as::<_, ParticipationRequest>(&format!(
            "INSERT INTO participation_requests (id, event_id, requester_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(RequestId::new())
        .bind(request.event_id)
        .bind(request.requester_id)
        .bind(request.status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx("Failed to create request"))
    }

    async fn update_status(
        &mut self,
        ids: &[RequestId],
        status: RequestStatus,
    ) -> AppResult<Vec<ParticipationRequest>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "UPDATE participation_requests SET status = $2, updated_at = NOW() \
             WHERE id = ANY($1) RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(ids.to_vec())
        .bind(status)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx("Failed to update request status"))?;

        Ok(in_input_order(ids, rows))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { tx, event } = *self;
        let event_id = event.id;
        tx.commit()
            .await
            .map_err(map_sqlx("Failed to commit transaction"))?;
        debug!(event_id = %event_id, "Event transaction committed");
        Ok(())
    }
}

/// Reorder rows returned by an `= ANY(...)` query to follow `ids`.
fn in_input_order(ids: &[RequestId], rows: Vec<ParticipationRequest>) -> Vec<ParticipationRequest> {
    let mut by_id: HashMap<RequestId, ParticipationRequest> =
        rows.into_iter().map(|r| (r.id, r)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
