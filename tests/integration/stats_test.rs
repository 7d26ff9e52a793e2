//! Integration tests for hit ingestion, stats, and popularity.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn hit(app: &TestApp, uri: &str, ip: &str, timestamp: &str) {
    let response = app
        .request(
            "POST",
            "/api/hit",
            Some(json!({
                "app": "eventhub-main",
                "uri": uri,
                "ip": ip,
                "timestamp": timestamp,
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_stats_total_and_unique() {
    let app = TestApp::new();
    hit(&app, "/events/1", "10.0.0.1", "2024-03-01 10:00:00").await;
    hit(&app, "/events/1", "10.0.0.1", "2024-03-01 11:00:00").await;
    hit(&app, "/events/1", "10.0.0.2", "2024-03-01 12:00:00").await;
    hit(&app, "/events/2", "10.0.0.3", "2024-03-01 12:00:00").await;
    hit(&app, "/events/2", "10.0.0.3", "2025-01-01 00:00:00").await;

    let window = "start=2024-03-01%2000:00:00&end=2024-03-02%2000:00:00";

    let total = app.request("GET", &format!("/api/stats?{window}"), None).await;
    assert_eq!(total.status, StatusCode::OK);
    assert_eq!(
        total.body,
        json!([
            { "app": "eventhub-main", "uri": "/events/1", "hits": 3 },
            { "app": "eventhub-main", "uri": "/events/2", "hits": 1 },
        ])
    );

    let unique = app
        .request(
            "GET",
            &format!("/api/stats?{window}&uris=/events/1&uris=/events/2&unique=true"),
            None,
        )
        .await;
    assert_eq!(unique.status, StatusCode::OK);
    assert_eq!(unique.body[0]["uri"], "/events/1");
    assert_eq!(unique.body[0]["hits"], 2);
}

#[tokio::test]
async fn test_stats_start_after_end_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .request(
            "GET",
            "/api/stats?start=2024-03-02%2000:00:00&end=2024-03-01%2000:00:00",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_RANGE");
}

#[tokio::test]
async fn test_hit_with_bad_timestamp_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/hit",
            Some(json!({
                "app": "eventhub-main",
                "uri": "/events",
                "ip": "10.0.0.1",
                "timestamp": "2024-03-01T10:00:00Z",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_popularity_records_its_own_hit() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let event = app.create_event(owner, 0, false).await;
    app.add_request(guest, event).await;

    let response = app
        .request("GET", &format!("/api/events/popularity?ids={event}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body[0]["eventId"], event.to_string());
    assert_eq!(response.body[0]["confirmedRequests"], 1);
    assert_eq!(response.body[0]["views"], 0);

    let stats = app
        .request(
            "GET",
            "/api/stats?start=2000-01-01%2000:00:00&end=2999-01-01%2000:00:00&uris=/events/popularity",
            None,
        )
        .await;
    assert_eq!(stats.body[0]["hits"], 1);
}
