//! Hit recording and view aggregation.

pub mod aggregator;
pub mod recorder;

pub use aggregator::ViewAggregator;
pub use recorder::HitRecorder;
