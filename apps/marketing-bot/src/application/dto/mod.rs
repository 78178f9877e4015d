//! Data Transfer Objects
//!
//! Commands and reports crossing the HTTP boundary.

mod cafe_dto;
mod draft_dto;
mod youtube_dto;

pub use cafe_dto::*;
pub use draft_dto::*;
pub use youtube_dto::*;
