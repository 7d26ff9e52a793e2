//! Route definitions for the EventHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(request_routes())
        .merge(moderation_routes())
        .merge(stats_routes())
        .merge(event_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Requester endpoints: create, list, cancel
fn request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/requests",
            post(handlers::requests::add_request).get(handlers::requests::list_requests),
        )
        .route(
            "/users/{user_id}/requests/{request_id}/cancel",
            patch(handlers::requests::cancel_request),
        )
}

/// Event owner endpoints: view and moderate requests
fn moderation_routes() -> Router<AppState> {
    Router::new().route(
        "/users/{user_id}/events/{event_id}/requests",
        get(handlers::moderation::list_event_requests)
            .patch(handlers::moderation::update_request_status),
    )
}

/// Hit ingestion and view statistics
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/hit", post(handlers::stats::record_hit))
        .route("/stats", get(handlers::stats::get_stats))
}

/// Event listing enrichment
fn event_routes() -> Router<AppState> {
    Router::new().route("/events/popularity", get(handlers::popularity::get_popularity))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
