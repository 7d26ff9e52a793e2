//! Fixtures shared by the service tests.

use std::time::Duration;

use chrono::Utc;

use eventhub_core::types::{EventId, UserId};
use eventhub_database::{MemoryStore, StoreManager};
use eventhub_entity::event::{Event, EventState};
use eventhub_entity::user::User;

pub struct Fixture {
    pub store: MemoryStore,
    pub stores: StoreManager,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new(Duration::from_secs(5));
        let stores = StoreManager::memory(store.clone());
        Self { store, stores }
    }

    pub async fn user(&self, name: &str) -> UserId {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.store.insert_user(user).await;
        id
    }

    pub async fn event(&self, initiator: UserId, limit: i32, moderation: bool) -> EventId {
        let event = Event {
            id: EventId::new(),
            initiator_id: initiator,
            title: "Concert".to_string(),
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
}
