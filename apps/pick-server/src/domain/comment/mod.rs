//! Comment Bounded Context

pub mod comment;
pub mod repository;

pub use comment::{
    Comment, DELETED_PLACEHOLDER, FORBIDDEN_MESSAGE, LikeToggle, MAX_CONTENT_CHARS, Reply,
};
pub use repository::CommentRepository;
