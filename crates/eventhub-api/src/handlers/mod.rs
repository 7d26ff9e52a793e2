//! Route handlers organized by domain.

pub mod health;
pub mod moderation;
pub mod popularity;
pub mod requests;
pub mod stats;
