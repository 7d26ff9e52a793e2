//! PostgreSQL implementations of the store traits.

pub mod event;
pub mod hit;
pub mod request;
pub mod user;

pub use event::EventRepository;
pub use hit::HitRepository;
pub use request::{ParticipationRequestRepository, PgEventUnitOfWork};
pub use user::UserRepository;
