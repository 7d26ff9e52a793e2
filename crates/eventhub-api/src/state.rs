//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use eventhub_core::config::AppConfig;
use eventhub_database::StoreManager;
use eventhub_service::{
    HitRecorder, ModerationBatchProcessor, PopularityService, RequestAdmissionService,
    ViewAggregator,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the state was built, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Store backend (PostgreSQL or in-memory)
    pub stores: StoreManager,

    // ── Services ─────────────────────────────────────────────
    /// Request creation, cancellation and listing
    pub admission: Arc<RequestAdmissionService>,
    /// Moderation batches
    pub moderation: Arc<ModerationBatchProcessor>,
    /// Hit ingestion
    pub hits: Arc<HitRecorder>,
    /// View statistics
    pub views: Arc<ViewAggregator>,
    /// Event popularity enrichment
    pub popularity: Arc<PopularityService>,
}
