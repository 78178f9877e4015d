//! Builders shared by the use case tests.

use pick_server::domain::catalog::ShowCategory;
use pick_server::domain::mission::{MissionForm, MissionKind};

use crate::domain::cafe::CafeArticle;
use crate::domain::draft::{DraftContent, MissionDraft, SourceVideo};
use crate::domain::shared::{ChannelId, Timestamp, VideoId};
use crate::domain::video::VideoSnapshot;

pub fn snapshot(id: &str, title: &str, channel: &str, views: u64) -> VideoSnapshot {
    VideoSnapshot {
        video_id: VideoId::new(id),
        title: title.to_string(),
        description: String::new(),
        channel_id: ChannelId::new(channel),
        channel_name: format!("{channel} 채널"),
        subscriber_count: 1000,
        view_count: views,
        like_count: views / 10,
        comment_count: 0,
        duration: Some("PT10M".to_string()),
        published_at: Some(Timestamp::now()),
        thumbnail: None,
    }
}

pub fn pending_draft(source_title: &str, show_id: &str, category: ShowCategory) -> MissionDraft {
    MissionDraft::generated(
        DraftContent {
            title: format!("{source_title} 누가 이길까?"),
            description: String::new(),
            kind: MissionKind::Majority,
            form: MissionForm::Binary,
            options: vec!["A".to_string(), "B".to_string()],
        },
        show_id,
        category,
        SourceVideo::new(VideoId::new("v"), source_title, "", "", "ch"),
        Timestamp::now(),
    )
    .unwrap()
}

pub fn cafe_article(post_id: &str, title: &str, description: &str) -> CafeArticle {
    CafeArticle {
        title: title.to_string(),
        link: format!("https://cafe.naver.com/imsanbu/{post_id}"),
        description: description.to_string(),
        cafe_name: "임산부 모임".to_string(),
        cafe_url: "https://cafe.naver.com/imsanbu".to_string(),
        board_name: None,
        published_at: None,
    }
}
