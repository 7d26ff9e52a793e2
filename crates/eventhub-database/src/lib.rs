//! # eventhub-database
//!
//! Persistence for EventHub: the store traits the services are written
//! against, their PostgreSQL implementations, an in-memory backend with
//! the same per-event locking discipline, and the [`StoreManager`] that
//! picks one from configuration.

pub mod connection;
pub mod error;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use manager::StoreManager;
pub use memory::MemoryStore;
pub use store::{EventDirectory, EventUnitOfWork, HitStore, ParticipationStore, UserDirectory};
