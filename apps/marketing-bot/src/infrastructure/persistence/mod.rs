//! Persistence adapters.

mod in_memory;

pub use in_memory::{
    InMemoryCafePostRepository, InMemoryChannelRepository, InMemoryDraftRepository,
    InMemoryProgressRepository, InMemoryVideoRepository,
};
