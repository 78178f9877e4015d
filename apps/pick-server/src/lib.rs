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

//! Pick Server - RealPick Core Library
//!
//! Viewers pick outcomes of Korean reality shows, earn points and tiers, and
//! get notified when missions open and close.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `catalog`: Shows and categories
//!   - `mission`: Mission aggregate, lifecycle, match episodes
//!   - `pick`, `tally`, `scoring`: Votes, counts, points and tiers
//!   - `comment`, `user`, `notification`
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `EmailSenderPort`, `MarketingBotPort`, `EventPublisherPort`
//!   - `use_cases`: Missions, picks, results, settlement, dispatch, cron jobs
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters
//!   - `http`: REST API and cron endpoints
//!   - `persistence`: In-memory repositories
//!   - `email`, `marketing_bot`: Outbound HTTP clients
//!   - `config`: Settings and dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Service errors and their HTTP mapping.
pub mod error;

pub use error::{ErrorCode, ServiceError};
