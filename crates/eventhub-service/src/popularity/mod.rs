//! Event popularity enrichment.

pub mod service;

pub use service::{EventPopularity, PopularityService};
