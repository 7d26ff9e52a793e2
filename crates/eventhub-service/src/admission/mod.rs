//! Participation admission control.

pub mod count;
pub mod decider;
pub mod moderation;
pub mod service;

pub use count::ConfirmedCountProvider;
pub use decider::{AdmissionDecider, AdmissionDecision};
pub use moderation::{ModerationBatchProcessor, ModerationOutcome};
pub use service::RequestAdmissionService;
