//! Participation request domain entities.

pub mod model;
pub mod status;

pub use model::{ConfirmedCount, NewParticipationRequest, ParticipationRequest};
pub use status::{ModerationAction, RequestStatus};
