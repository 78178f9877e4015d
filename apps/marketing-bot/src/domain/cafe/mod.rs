//! Cafe Bounded Context
//!
//! Naver Cafe posts about the shows, with a suggested comment each, and the
//! progress of the crawl that collects them.

pub mod filter;
pub mod post;
pub mod progress;
pub mod repository;

pub use filter::{ArticleFilter, DEFAULT_EXCLUDED_BOARDS};
pub use post::{CafeArticle, CafePost, CafePostStatus, DEFAULT_SOURCE_NAME};
pub use progress::{CrawlProgress, CrawlStatus};
pub use repository::{CafePostRepository, ProgressRepository};
