//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

/// Logs method, path, status and latency of every API call.
///
/// Server errors log at `warn`, client errors (including admission
/// conflicts) at `info`, everything else at `debug`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match level_for(status) {
        Level::Warn => warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request failed"),
        Level::Info => info!(%method, %path, status = status.as_u16(), elapsed_ms, "Request rejected"),
        Level::Debug => debug!(%method, %path, status = status.as_u16(), elapsed_ms, "Request served"),
    }

    response
}

#[derive(Debug, PartialEq, Eq)]
enum Level {
    Warn,
    Info,
    Debug,
}

fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::Warn
    } else if status.is_client_error() {
        Level::Info
    } else {
        Level::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_status() {
        assert_eq!(level_for(StatusCode::INTERNAL_SERVER_ERROR), Level::Warn);
        assert_eq!(level_for(StatusCode::CONFLICT), Level::Info);
        assert_eq!(level_for(StatusCode::CREATED), Level::Debug);
    }
}
