//! Core type definitions used across the EventHub workspace.

pub mod id;
pub mod pagination;
pub mod timestamp;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use timestamp::{STATS_TIMESTAMP_FORMAT, format_stats_timestamp, parse_stats_timestamp};
