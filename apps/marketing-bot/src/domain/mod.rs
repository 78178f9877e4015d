//! Domain layer of the marketing bot.
//!
//! - `video`: crawled videos, channels and the relevance rule
//! - `draft`: AI mission drafts and show detection
//! - `cafe`: Naver Cafe posts and crawl progress

pub mod cafe;
pub mod draft;
pub mod shared;
pub mod video;
