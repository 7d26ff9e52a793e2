//! HTTP-level integration tests over the in-memory backend.

mod helpers;
mod moderation_test;
mod requests_test;
mod stats_test;
