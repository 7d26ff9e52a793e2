//! Participation request handlers for the requester.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use eventhub_core::types::{RequestId, UserId};

use crate::dto::request::{AddRequestParams, RequesterRequestsParams};
use crate::dto::response::{PaginatedResponse, ParticipationRequestDto};
use crate::error::ApiError;
use crate::extractors::{PaginationParams, parse_id};
use crate::state::AppState;

/// POST /api/users/{userId}/requests?eventId=
pub async fn add_request(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<AddRequestParams>,
) -> Result<(StatusCode, Json<ParticipationRequestDto>), ApiError> {
    let user_id: UserId = parse_id("userId", &user_id)?;
    let request = state.admission.add_request(user_id, params.event_id).await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

/// GET /api/users/{userId}/requests?eventId=&page=&per_page=
pub async fn list_requests(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<RequesterRequestsParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<ParticipationRequestDto>>, ApiError> {
    let user_id: UserId = parse_id("userId", &user_id)?;
    let page = state
        .admission
        .list_requester_requests(user_id, filter.event_id, pagination.into_page_request())
        .await?;
    Ok(Json(page.map(ParticipationRequestDto::from).into()))
}

/// PATCH /api/users/{userId}/requests/{requestId}/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    Path((user_id, request_id)): Path<(String, String)>,
) -> Result<Json<ParticipationRequestDto>, ApiError> {
    let user_id: UserId = parse_id("userId", &user_id)?;
    let request_id: RequestId = parse_id("requestId", &request_id)?;
    let request = state.admission.cancel_request(user_id, request_id).await?;
    Ok(Json(request.into()))
}
