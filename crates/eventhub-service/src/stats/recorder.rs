//! Append-only hit recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_database::store::HitStore;
use eventhub_entity::stats::{HitRecord, NewHit};

/// Stores one immutable record per observed page view.
#[derive(Debug, Clone)]
pub struct HitRecorder {
    hits: Arc<dyn HitStore>,
}

impl HitRecorder {
    /// Creates a new hit recorder.
    pub fn new(hits: Arc<dyn HitStore>) -> Self {
        Self { hits }
    }

    /// Append a hit. Repeated views are all kept.
    pub async fn record_hit(
        &self,
        app: &str,
        uri: &str,
        ip: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<HitRecord> {
        let hit = NewHit {
            app: required("app", app)?,
            uri: required("uri", uri)?,
            ip: required("ip", ip)?,
            timestamp,
        };

        let record = self.hits.append(hit).await?;
        debug!(app = %record.app, uri = %record.uri, ip = %record.ip, "Hit recorded");
        Ok(record)
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("Field '{field}' must not be blank")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::error::ErrorKind;

    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let fx = Fixture::new();
        let recorder = HitRecorder::new(fx.stores.hits.clone());

        let err = recorder
            .record_hit("eventhub-main", "  ", "10.0.0.1", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_record_trims_and_keeps_duplicates() {
        let fx = Fixture::new();
        let recorder = HitRecorder::new(fx.stores.hits.clone());
        let now = Utc::now();

        let first = recorder
            .record_hit(" eventhub-main ", "/events/1", "10.0.0.1", now)
            .await
            .unwrap();
        let second = recorder
            .record_hit("eventhub-main", "/events/1", "10.0.0.1", now)
            .await
            .unwrap();

        assert_eq!(first.app, "eventhub-main");
        assert_ne!(first.id, second.id);
    }
}
