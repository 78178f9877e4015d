// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Marketing Bot - RealPick Mission Draft Generator
//!
//! Crawls YouTube and Naver Cafe for show chatter, screens videos with
//! Gemini and stores AI mission drafts for admin review.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `video`: Crawled videos, channels, keyword relevance
//!   - `draft`: AI mission drafts, show keyword table
//!   - `cafe`: Naver Cafe posts and crawl progress
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `YouTubePort`, `LlmPort`, `CafeSearchPort`
//!   - `use_cases`: Crawl, screen and draft, daily run, review, show-id repair, cafe sync
//!   - `prompts`: Gemini prompts and reply parsing
//!
//! - **Infrastructure**: Adapters
//!   - `http`: REST API
//!   - `youtube`, `gemini`, `naver`: Outbound HTTP clients
//!   - `persistence`: In-memory repositories
//!   - `config`: YAML settings and dependency injection container
//!
//! The show catalog, shared identifiers and the error vocabulary come from
//! `pick_server`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Error mapping onto the shared service error.
pub mod error;

pub use error::{ErrorCode, ServiceError};
