//! Hit ingestion and view statistics handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::Query;
use validator::Validate;

use eventhub_core::types::parse_stats_timestamp;
use eventhub_entity::stats::{ViewQuery, ViewStats};

use crate::dto::request::{HitRequest, StatsQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/hit
pub async fn record_hit(
    State(state): State<AppState>,
    Json(req): Json<HitRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;
    let timestamp = parse_stats_timestamp(&req.timestamp)?;

    state
        .hits
        .record_hit(&req.app, &req.uri, &req.ip, timestamp)
        .await?;
    Ok(StatusCode::CREATED)
}

/// GET /api/stats?start=&end=&uris=&uris=&unique=
pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<Vec<ViewStats>>, ApiError> {
    let query = ViewQuery {
        start: parse_stats_timestamp(&params.start)?,
        end: parse_stats_timestamp(&params.end)?,
        uris: params.uris,
        unique: params.unique,
        app: None,
    };

    Ok(Json(state.views.query(&query).await?))
}
