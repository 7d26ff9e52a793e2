//! Application builder: wires stores and services into [`AppState`].

use std::sync::Arc;
use std::time::Instant;

use eventhub_core::config::AppConfig;
use eventhub_database::StoreManager;
use eventhub_service::{
    ConfirmedCountProvider, HitRecorder, ModerationBatchProcessor, PopularityService,
    RequestAdmissionService, RetryPolicy, ViewAggregator,
};

use crate::state::AppState;

/// Builds the shared state from configuration and an initialized store set.
pub fn build_state(config: AppConfig, stores: StoreManager) -> AppState {
    let retry = RetryPolicy::from_config(&config.admission);

    let admission = Arc::new(RequestAdmissionService::new(&stores, retry));
    let moderation = Arc::new(ModerationBatchProcessor::new(&stores, retry));

    let hits = Arc::new(HitRecorder::new(Arc::clone(&stores.hits)));
    let views = Arc::new(ViewAggregator::new(Arc::clone(&stores.hits)));
    let counts = Arc::new(ConfirmedCountProvider::new(Arc::clone(&stores.participation)));
    let popularity = Arc::new(PopularityService::new(
        Arc::clone(&stores.events),
        counts,
        Arc::clone(&views),
        config.stats.clone(),
    ));

    AppState {
        config: Arc::new(config),
        started_at: Instant::now(),
        stores,
        admission,
        moderation,
        hits,
        views,
        popularity,
    }
}
