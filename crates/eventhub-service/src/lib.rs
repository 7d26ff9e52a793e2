//! # eventhub-service
//!
//! Business logic for EventHub: participation admission, moderation
//! batches, confirmed-count lookups, hit recording, view aggregation, and
//! event popularity.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admission;
pub mod popularity;
pub mod retry;
pub mod stats;

#[cfg(test)]
mod testing;

pub use admission::{
    AdmissionDecider, AdmissionDecision, ConfirmedCountProvider, ModerationBatchProcessor,
    ModerationOutcome, RequestAdmissionService,
};
pub use popularity::{EventPopularity, PopularityService};
pub use retry::RetryPolicy;
pub use stats::{HitRecorder, ViewAggregator};
