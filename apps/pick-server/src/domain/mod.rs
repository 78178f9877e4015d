//! Domain Layer
//!
//! Entities, value objects, repository traits and domain errors.
//! Nothing here depends on infrastructure.

pub mod catalog;
pub mod comment;
pub mod mission;
pub mod notification;
pub mod pick;
pub mod scoring;
pub mod shared;
pub mod tally;
pub mod user;
