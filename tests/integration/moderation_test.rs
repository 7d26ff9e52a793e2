//! Integration tests for the event owner's moderation endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_partial_confirm_over_http() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let event = app.create_event(owner, 1, true).await;
    let first = app.add_request(a, event).await;
    let second = app.add_request(b, event).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/users/{owner}/events/{event}/requests"),
            Some(json!({ "requestIds": [first, second], "status": "CONFIRMED" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let confirmed = response.body["confirmedRequests"].as_array().unwrap();
    let rejected = response.body["rejectedRequests"].as_array().unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["id"], first);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["id"], second);
    assert_eq!(rejected[0]["status"], "PENDING");
}

#[tokio::test]
async fn test_reject_batch_and_owner_listing() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let guest = app.create_user("guest").await;
    let event = app.create_event(owner, 5, true).await;
    let request_id = app.add_request(guest, event).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/users/{owner}/events/{event}/requests"),
            Some(json!({ "requestIds": [request_id], "status": "REJECTED" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rejectedRequests"][0]["status"], "REJECTED");

    let listing = app
        .request(
            "GET",
            &format!("/api/users/{owner}/events/{event}/requests"),
            None,
        )
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body[0]["status"], "REJECTED");

    let forbidden = app
        .request(
            "GET",
            &format!("/api/users/{guest}/events/{event}/requests"),
            None,
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::CONFLICT);
    assert_eq!(forbidden.body["reason"], "NOT_OWNER");
}

#[tokio::test]
async fn test_non_pending_request_in_batch_is_conflict() {
    let app = TestApp::new();
    let owner = app.create_user("owner").await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let event = app.create_event(owner, 5, true).await;
    let first = app.add_request(a, event).await;
    let second = app.add_request(b, event).await;

    let path = format!("/api/users/{owner}/events/{event}/requests");
    app.request(
        "PATCH",
        &path,
        Some(json!({ "requestIds": [second], "status": "REJECTED" })),
    )
    .await;

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "requestIds": [first, second], "status": "CONFIRMED" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["reason"], "INVALID_STATE");

    let listing = app.request("GET", &path, None).await;
    let first_status = listing
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == first.as_str())
        .map(|r| r["status"].clone());
    assert_eq!(first_status, Some(json!("PENDING")));
}
