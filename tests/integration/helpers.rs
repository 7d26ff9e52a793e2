//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use eventhub_core::config::AppConfig;
use eventhub_core::types::{EventId, UserId};
use eventhub_database::{MemoryStore, StoreManager};
use eventhub_entity::event::{Event, EventState};
use eventhub_entity::user::User;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-memory backend for seeding users and events
    pub store: MemoryStore,
}

impl TestApp {
    /// Create a new test application over the in-memory backend
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();

        let store = MemoryStore::new(config.admission.lock_timeout());
        let stores = StoreManager::memory(store.clone());
        let state = eventhub_api::build_state(config, stores);
        let router = eventhub_api::build_router(state);

        Self { router, store }
    }

    /// Create a user and return their ID
    pub async fn create_user(&self, name: &str) -> UserId {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{name}@test.com"),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.store.insert_user(user).await;
        id
    }

    /// Create a published event and return its ID
    pub async fn create_event(&self, initiator: UserId, limit: i32, moderation: bool) -> EventId {
        let event = Event {
            id: EventId::new(),
            initiator_id: initiator,
            title: "Integration test event".to_string(),
            state: EventState::Published,
            participant_limit: limit,
            request_moderation: moderation,
            published_on: Some(Utc::now()),
            created_at: Utc::now(),
        };
        let id = event.id;
        self.store.insert_event(event).await;
        id
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Forwarded-For", "192.0.2.10")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a participation request and return its ID
    pub async fn add_request(&self, user: UserId, event: EventId) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/users/{user}/requests?eventId={event}"),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Request creation failed: {:?}",
            response.body
        );
        response.body["id"]
            .as_str()
            .expect("No id in request response")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
