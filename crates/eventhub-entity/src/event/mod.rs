//! Event domain entities.

pub mod model;
pub mod policy;

pub use model::{Event, EventState};
pub use policy::EventCapacityPolicy;
