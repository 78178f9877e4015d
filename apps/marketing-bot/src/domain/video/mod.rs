//! Video Bounded Context
//!
//! YouTube videos collected for show keywords, their channels and the
//! relevance rule that keeps unrelated search hits out.

pub mod relevance;
pub mod repository;
#[allow(clippy::module_inception)]
pub mod video;

pub use relevance::{is_relevant, program_keywords};
pub use repository::{ChannelRepository, VideoRepository};
pub use video::{
    Channel, ChannelStatus, VIDEO_TTL_DAYS, Video, VideoSnapshot, thumbnail_url, watch_url,
};
