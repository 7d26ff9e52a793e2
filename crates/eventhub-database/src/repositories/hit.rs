//! Hit repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use eventhub_core::result::AppResult;
use eventhub_core::types::HitId;
use eventhub_entity::stats::{HitRecord, NewHit, ViewQuery, ViewStats};

use crate::error::map_sqlx;
use crate::store::HitStore;

/// Append-only storage for page hits.
#[derive(Debug, Clone)]
pub struct HitRepository {
    pool: PgPool,
}

impl HitRepository {
    /// Create a new hit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HitStore for HitRepository {
    async fn append(&self, hit: NewHit) -> AppResult<HitRecord> {
        sqlx::query_as::<_, HitRecord>(
            "INSERT INTO hits (id, app, uri, ip, viewed_at) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, app, uri, ip, viewed_at AS timestamp",
        )
        .bind(HitId::new())
        .bind(&hit.app)
        .bind(&hit.uri)
        .bind(&hit.ip)
        .bind(hit.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx("Failed to record hit"))
    }

    async fn aggregate(&self, query: &ViewQuery) -> AppResult<Vec<ViewStats>> {
        let counter = if query.unique {
            "COUNT(DISTINCT ip)"
        } else {
            "COUNT(*)"
        };

        sqlx::query_as::<_, ViewStats>(&format!(
            "SELECT app, uri, {counter} AS hits FROM hits \
             WHERE viewed_at BETWEEN $1 AND $2 \
               AND (cardinality($3::text[]) = 0 OR uri = ANY($3)) \
               AND ($4::text IS NULL OR app = $4) \
             GROUP BY app, uri ORDER BY hits DESC, app ASC, uri ASC"
        ))
        .bind(query.start)
        .bind(query.end)
        .bind(&query.uris)
        .bind(query.app.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx("Failed to aggregate hits"))
    }
}
