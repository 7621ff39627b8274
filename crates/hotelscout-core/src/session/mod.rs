//! Session domain model and repository.

pub mod model;
pub mod repository;

pub use model::{DisplayOptions, QueryParams, Session, SortOrder};
pub use repository::{InMemorySessionRepository, SessionRepository};
