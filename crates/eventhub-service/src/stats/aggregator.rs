//! View statistics over recorded hits.

use std::sync::Arc;

use tracing::debug;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::format_stats_timestamp;
use eventhub_database::store::HitStore;
use eventhub_entity::stats::{ViewQuery, ViewStats};

/// Computes hit counts per (app, uri) for a time window.
#[derive(Debug, Clone)]
pub struct ViewAggregator {
    hits: Arc<dyn HitStore>,
}

impl ViewAggregator {
    /// Creates a new view aggregator.
    pub fn new(hits: Arc<dyn HitStore>) -> Self {
        Self { hits }
    }

    /// Aggregate hits in `[start, end]`, most viewed first.
    ///
    /// An empty URI list means every URI. With `unique` set, each client IP
    /// counts once per (app, uri).
    pub async fn query(&self, query: &ViewQuery) -> AppResult<Vec<ViewStats>> {
        if !query.is_valid_range() {
            return Err(AppError::invalid_range(format!(
                "Start {} is after end {}",
                format_stats_timestamp(&query.start),
                format_stats_timestamp(&query.end)
            )));
        }

        let stats = self.hits.aggregate(query).await?;
        debug!(
            uris = query.uris.len(),
            unique = query.unique,
            groups = stats.len(),
            "Aggregated view stats"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use eventhub_core::error::ErrorKind;

    use crate::stats::HitRecorder;
    use crate::testing::Fixture;

    fn window(unique: bool, uris: &[&str]) -> ViewQuery {
        let now = Utc::now();
        ViewQuery {
            start: now - Duration::hours(1),
            end: now + Duration::hours(1),
            uris: uris.iter().map(|u| u.to_string()).collect(),
            unique,
            app: None,
        }
    }

    #[tokio::test]
    async fn test_start_after_end_is_invalid_range() {
        let fx = Fixture::new();
        let aggregator = ViewAggregator::new(fx.stores.hits.clone());
        let now = Utc::now();

        let err = aggregator
            .query(&ViewQuery {
                start: now,
                end: now - Duration::seconds(1),
                uris: Vec::new(),
                unique: false,
                app: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRange);
    }

    #[tokio::test]
    async fn test_unique_count_never_exceeds_total() {
        let fx = Fixture::new();
        let recorder = HitRecorder::new(fx.stores.hits.clone());
        let aggregator = ViewAggregator::new(fx.stores.hits.clone());
        let now = Utc::now();

        for (uri, ip) in [
            ("/events/1", "10.0.0.1"),
            ("/events/1", "10.0.0.1"),
            ("/events/1", "10.0.0.2"),
            ("/events/2", "10.0.0.1"),
            ("/events", "10.0.0.3"),
        ] {
            recorder.record_hit("eventhub-main", uri, ip, now).await.unwrap();
        }

        let total = aggregator.query(&window(false, &[])).await.unwrap();
        let unique = aggregator.query(&window(true, &[])).await.unwrap();
        assert_eq!(total.len(), 3);
        assert_eq!(total[0].hits, 3);
        for stat in &unique {
            let matching = total.iter().find(|t| t.uri == stat.uri).unwrap();
            assert!(stat.hits <= matching.hits);
        }

        let filtered = aggregator
            .query(&window(true, &["/events/1", "/events/9"]))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].hits, 2);
    }
}
