//! Integration tests for request creation, listing and cancellation.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_add_request_returns_created_dto() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let event = app.create_event(owner, 0, false).await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{guest}/requests?eventId={event}"),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "CONFIRMED");
    assert_eq!(response.body["event"], event.to_string());
    assert_eq!(response.body["requester"], guest.to_string());
    assert!(response.body["created"].as_str().is_some());
}

#[tokio::test]
async fn test_self_request_is_conflict() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let event = app.create_event(owner, 0, false).await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{owner}/requests?eventId={event}"),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
    assert_eq!(response.body["reason"], "SELF_REQUEST");
}

#[tokio::test]
async fn test_duplicate_request_is_conflict() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let event = app.create_event(owner, 10, true).await;

    app.add_request(guest, event).await;
    let response = app
        .request(
            "POST",
            &format!("/api/users/{guest}/requests?eventId={event}"),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["reason"], "DUPLICATE_REQUEST");
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let app = TestApp::new();
    let guest = app.create_user("guest").await;
    let missing = eventhub_core::types::EventId::new();

    let response = app
        .request(
            "POST",
            &format!("/api/users/{guest}/requests?eventId={missing}"),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_user_id_is_bad_request() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/users/not-a-uuid/requests", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_requests_filters_by_event() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let first = app.create_event(owner, 0, false).await;
    let second = app.create_event(owner, 0, false).await;
    app.add_request(guest, first).await;
    app.add_request(guest, second).await;

    let all = app
        .request("GET", &format!("/api/users/{guest}/requests"), None)
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["total"], 2);

    let filtered = app
        .request(
            "GET",
            &format!("/api/users/{guest}/requests?eventId={second}&page=1&per_page=5"),
            None,
        )
        .await;
    assert_eq!(filtered.status, StatusCode::OK);
    assert_eq!(filtered.body["total"], 1);
    assert_eq!(filtered.body["items"][0]["event"], second.to_string());
    assert_eq!(filtered.body["perPage"], 5);
}

#[tokio::test]
async fn test_cancel_then_cancel_again() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let event = app.create_event(owner, 1, false).await;
    let request_id = app.add_request(guest, event).await;

    let path = format!("/api/users/{guest}/requests/{request_id}/cancel");
    let canceled = app.request("PATCH", &path, None).await;
    assert_eq!(canceled.status, StatusCode::OK);
    assert_eq!(canceled.body["status"], "CANCELED");

    let again = app.request("PATCH", &path, None).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["reason"], "INVALID_TRANSITION");

    // The freed slot can be taken again.
    let other = app.create_user("other").await;
    app.add_request(other, event).await;
}

#[tokio::test]
async fn test_cancel_someone_elses_request_is_conflict() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let stranger = app.create_user("stranger").await;
    let event = app.create_event(owner, 0, true).await;
    let request_id = app.add_request(guest, event).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/users/{stranger}/requests/{request_id}/cancel"),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["reason"], "NOT_OWNER");
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["backend"], "memory");
}
