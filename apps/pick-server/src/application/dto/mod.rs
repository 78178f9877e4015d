//! Data Transfer Objects for API boundaries.

mod comment_dto;
mod cron_dto;
mod mission_dto;
mod notification_dto;
mod user_dto;

pub use comment_dto::{CommentDto, ReplyDto};
pub use cron_dto::{
    AutoMissionReport, DeadlineSweepReport, DigestRunReport, EpisodeOpenReport, OpenedEpisode,
};
pub use mission_dto::{
    MatchResultsDto, MissionDto, MissionResultsDto, OptionResultDto, PickReceiptDto,
    SettlementDto,
};
pub use notification_dto::{
    DeliveryResult, DigestMission, DigestSlot, DispatchKind, DispatchReport,
    MissionNotificationRequest,
};
pub use user_dto::{PointLogDto, RankingEntryDto, TopVoterDto, UserDto};
