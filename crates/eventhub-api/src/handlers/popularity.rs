//! Event popularity handler.

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum_extra::extract::Query;
use chrono::Utc;
use std::net::SocketAddr;
use tracing::warn;

use crate::dto::request::PopularityQuery;
use crate::dto::response::EventPopularityDto;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/events/popularity?ids=&ids=
///
/// Every call is itself recorded as a hit on the listing URI.
pub async fn get_popularity(
    State(state): State<AppState>,
    Query(params): Query<PopularityQuery>,
    request: Request,
) -> Result<Json<Vec<EventPopularityDto>>, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer);
    let path = request.uri().path().to_string();
    if let Err(err) = state
        .hits
        .record_hit(&state.config.stats.app_name, &path, &ip, Utc::now())
        .await
    {
        warn!(error = %err, "Failed to record listing hit");
    }

    let popularity = state.popularity.popularity(&params.ids).await?;
    Ok(Json(popularity.into_iter().map(Into::into).collect()))
}

/// First `X-Forwarded-For` entry, else the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "127.0.0.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }
}
