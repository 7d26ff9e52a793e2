//! Confirmed-request counts for batches of events.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use eventhub_core::result::AppResult;
use eventhub_core::types::EventId;
use eventhub_database::store::ParticipationStore;

/// Read-only occupancy lookup for listing and popularity code.
#[derive(Debug, Clone)]
pub struct ConfirmedCountProvider {
    requests: Arc<dyn ParticipationStore>,
}

impl ConfirmedCountProvider {
    /// Creates a new count provider.
    pub fn new(requests: Arc<dyn ParticipationStore>) -> Self {
        Self { requests }
    }

    /// Count CONFIRMED requests per event.
    ///
    /// Events without confirmed requests are omitted; use
    /// [`ConfirmedCountProvider::confirmed_for`] to default them to 0.
    pub async fn count_confirmed(&self, event_ids: &[EventId]) -> AppResult<HashMap<EventId, u64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut ids = event_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let counts = self.requests.count_confirmed(&ids).await?;
        debug!(events = ids.len(), non_zero = counts.len(), "Counted confirmed requests");
        Ok(counts)
    }

    /// Confirmed count for one event out of a [`count_confirmed`] result.
    ///
    /// [`count_confirmed`]: ConfirmedCountProvider::count_confirmed
    pub fn confirmed_for(counts: &HashMap<EventId, u64>, event_id: EventId) -> u64 {
        counts.get(&event_id).copied().unwrap_or(0)
    }
}
