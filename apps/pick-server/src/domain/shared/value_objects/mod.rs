//! Shared value objects.

mod identifiers;
mod timestamp;

pub use identifiers::{
    CommentId, MissionId, NotificationId, PickId, PointLogId, ReplyId, UserId,
};
pub use timestamp::{Timestamp, kst};
