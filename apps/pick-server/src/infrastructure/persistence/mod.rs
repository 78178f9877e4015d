//! Persistence Adapters
//!
//! In-memory implementations of the repository traits.

pub mod in_memory;

pub use in_memory::{
    InMemoryCommentRepository, InMemoryMissionRepository, InMemoryNotificationRepository,
    InMemoryPickRepository, InMemoryUserRepository,
};
