//! # eventhub-api
//!
//! HTTP API layer for EventHub built on Axum.
//!
//! Provides the participation, moderation, hit, stats, popularity and
//! health endpoints, middleware (request logging, CORS, compression,
//! timeouts), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_state;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
