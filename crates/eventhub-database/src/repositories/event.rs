//! Event repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::EventId;
use eventhub_entity::event::Event;

use crate::error::map_sqlx;
use crate::store::EventDirectory;

/// Read-only access to the events table.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventDirectory for EventRepository {
    async fn get_event(&self, id: EventId) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find event"))?
            .ok_or_else(|| AppError::not_found(format!("Event with id={id} was not found")))
    }

    async fn find_events(&self, ids: &[EventId]) -> AppResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ANY($1) ORDER BY created_at")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find events"))
    }
}
