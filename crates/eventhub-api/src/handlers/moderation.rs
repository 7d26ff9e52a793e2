//! Event owner handlers: request list and moderation batches.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use eventhub_core::types::{EventId, UserId};

use crate::dto::request::ModerationRequest;
use crate::dto::response::{ModerationResultDto, ParticipationRequestDto};
use crate::error::ApiError;
use crate::extractors::parse_id;
use crate::state::AppState;

/// GET /api/users/{userId}/events/{eventId}/requests
pub async fn list_event_requests(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Json<Vec<ParticipationRequestDto>>, ApiError> {
    let user_id: UserId = parse_id("userId", &user_id)?;
    let event_id: EventId = parse_id("eventId", &event_id)?;

    let requests = state
        .admission
        .list_event_requests(user_id, event_id)
        .await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// PATCH /api/users/{userId}/events/{eventId}/requests
pub async fn update_request_status(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(String, String)>,
    Json(req): Json<ModerationRequest>,
) -> Result<Json<ModerationResultDto>, ApiError> {
    req.validate()?;
    let user_id: UserId = parse_id("userId", &user_id)?;
    let event_id: EventId = parse_id("eventId", &event_id)?;

    let outcome = state
        .moderation
        .update_status(user_id, event_id, &req.request_ids, req.status)
        .await?;
    Ok(Json(outcome.into()))
}
