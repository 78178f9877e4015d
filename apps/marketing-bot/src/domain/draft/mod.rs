//! Draft Bounded Context
//!
//! Mission drafts the model writes from videos, and the keyword table that
//! ties a video to a show.

#[allow(clippy::module_inception)]
pub mod draft;
pub mod repository;
pub mod show_keywords;

pub use draft::{AI_AUTHOR, DraftContent, DraftStatus, MissionDraft, SourceVideo};
pub use repository::DraftRepository;
pub use show_keywords::{ShowMatch, detect_show, extract_show_keyword, resolve_show};
