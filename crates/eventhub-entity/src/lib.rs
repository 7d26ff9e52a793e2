//! # eventhub-entity
//!
//! Domain entity models for EventHub. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`; status enums map to PostgreSQL enum
//! types.

pub mod event;
pub mod request;
pub mod stats;
pub mod user;
