//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod collect_videos;
mod daily_auto_mission;
mod draft_review;
mod mission_drafts;
mod naver_cafe_sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use collect_videos::CollectVideosUseCase;
pub use daily_auto_mission::DailyAutoMissionUseCase;
pub use draft_review::DraftReviewUseCase;
pub use mission_drafts::{FALLBACK_SHOW_ID, MissionDraftsUseCase};
pub use naver_cafe_sync::NaverCafeSyncUseCase;
