//! Hit and view statistics entities.

pub mod hit;
pub mod view;

pub use hit::{HitRecord, NewHit};
pub use view::{ViewQuery, ViewStats};
