//! Confirmed counts and view counts for event listings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use eventhub_core::config::StatsConfig;
use eventhub_core::result::AppResult;
use eventhub_core::types::EventId;
use eventhub_database::store::EventDirectory;
use eventhub_entity::event::Event;
use eventhub_entity::stats::ViewQuery;

use crate::admission::ConfirmedCountProvider;
use crate::stats::ViewAggregator;

/// Popularity figures for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPopularity {
    /// The event.
    pub event_id: EventId,
    /// Number of CONFIRMED requests.
    pub confirmed_requests: u64,
    /// Distinct client IPs that viewed the event page since publication.
    pub views: u64,
}

/// Enriches event listings with occupancy and view counts.
#[derive(Debug, Clone)]
pub struct PopularityService {
    events: Arc<dyn EventDirectory>,
    counts: Arc<ConfirmedCountProvider>,
    views: Arc<ViewAggregator>,
    config: StatsConfig,
}

impl PopularityService {
    /// Creates a new popularity service.
    pub fn new(
        events: Arc<dyn EventDirectory>,
        counts: Arc<ConfirmedCountProvider>,
        views: Arc<ViewAggregator>,
        config: StatsConfig,
    ) -> Self {
        Self {
            events,
            counts,
            views,
            config,
        }
    }

    /// URI under which the event page is viewed.
    pub fn event_uri(&self, event_id: EventId) -> String {
        format!("{}/{event_id}", self.config.event_uri_prefix.trim_end_matches('/'))
    }

    /// Popularity of the given events, in request order. Unknown IDs are
    /// skipped.
    ///
    /// Views are unique IPs seen by this application on each event's page,
    /// counted from the earliest publication date in the batch until now.
    /// Unpublished events have none.
    pub async fn popularity(&self, event_ids: &[EventId]) -> AppResult<Vec<EventPopularity>> {
        let events = self.events.find_events(event_ids).await?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        let (counts, views) =
            futures::try_join!(self.counts.count_confirmed(&ids), self.view_counts(&events))?;

        let mut result = Vec::with_capacity(event_ids.len());
        for id in event_ids {
            if result.iter().any(|p: &EventPopularity| p.event_id == *id) {
                continue;
            }
            let Some(event) = events.iter().find(|e| e.id == *id) else {
                continue;
            };
            let views = if event.is_published() {
                views.get(&self.event_uri(*id)).copied().unwrap_or(0)
            } else {
                0
            };
            result.push(EventPopularity {
                event_id: *id,
                confirmed_requests: ConfirmedCountProvider::confirmed_for(&counts, *id),
                views,
            });
        }

        debug!(events = result.len(), "Computed event popularity");
        Ok(result)
    }

    /// Unique views per event URI, for published events only.
    async fn view_counts(&self, events: &[Event]) -> AppResult<HashMap<String, u64>> {
        let published: Vec<&Event> = events.iter().filter(|e| e.is_published()).collect();
        let Some(earliest) = published.iter().filter_map(|e| e.published_on).min() else {
            return Ok(HashMap::new());
        };

        // A publication stamp ahead of our clock must not invert the window.
        let end = Utc::now();
        let query = ViewQuery {
            start: earliest.min(end),
            end,
            uris: published.iter().map(|e| self.event_uri(e.id)).collect(),
            unique: true,
            app: Some(self.config.app_name.clone()),
        };

        Ok(self
            .views
            .query(&query)
            .await?
            .into_iter()
            .map(|stat| (stat.uri, stat.hits.max(0) as u64))
            .collect())
    }
}
