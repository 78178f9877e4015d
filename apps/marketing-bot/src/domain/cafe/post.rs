//! Naver Cafe search hits and the posts stored from them.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{CafePostId, Timestamp};

/// Fallback source name when the cafe URL has no path.
pub const DEFAULT_SOURCE_NAME: &str = "네이버 카페";

/// A cafe article found by search, with markup already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CafeArticle {
    /// Title.
    pub title: String,
    /// Article URL.
    pub link: String,
    /// Body excerpt.
    pub description: String,
    /// Cafe display name.
    pub cafe_name: String,
    /// Cafe home URL.
    pub cafe_url: String,
    /// Board the article was posted to, when known.
    pub board_name: Option<String>,
    /// Post time, when known.
    pub published_at: Option<Timestamp>,
}

impl CafeArticle {
    /// Article number: the last path segment of the link.
    #[must_use]
    pub fn post_id(&self) -> Option<&str> {
        last_segment(&self.link).filter(|s| !s.is_empty())
    }

    /// Cafe slug taken from the cafe URL.
    #[must_use]
    pub fn source_name(&self) -> &str {
        last_segment(&self.cafe_url)
            .filter(|s| !s.is_empty() && !s.contains('.'))
            .unwrap_or(DEFAULT_SOURCE_NAME)
    }

    /// Board name, falling back to a bracketed title prefix such as `[맛집]`.
    #[must_use]
    pub fn effective_board(&self) -> Option<&str> {
        if let Some(board) = self.board_name.as_deref().filter(|b| !b.trim().is_empty()) {
            return Some(board.trim());
        }
        let rest = self.title.trim_start().strip_prefix('[')?;
        let end = rest.find(']')?;
        Some(rest[..end].trim())
    }
}

fn last_segment(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    path.trim_end_matches('/').rsplit('/').next()
}

/// Review state of a stored post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CafePostStatus {
    /// Comment not yet posted.
    Pending,
}

/// A stored cafe post with the comment suggested for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafePost {
    /// Document id.
    pub id: CafePostId,
    /// Article number.
    pub post_id: String,
    /// Always `naver_cafe`.
    pub source: String,
    /// Cafe slug.
    pub source_name: String,
    /// Title.
    pub title: String,
    /// Body excerpt.
    pub content: String,
    /// Article URL.
    pub url: String,
    /// Board name, empty when unknown.
    pub board_name: String,
    /// Show the post is about, empty when unknown.
    pub show_id: String,
    /// Comment proposed by the model.
    pub suggested_comment: String,
    /// Review state.
    pub status: CafePostStatus,
    /// Post time, or the crawl time when unknown.
    pub published_at: Timestamp,
    /// When it was stored.
    pub created_at: Timestamp,
}

impl CafePost {
    /// Store `article` under its article number.
    #[must_use]
    pub fn from_article(
        article: &CafeArticle,
        post_id: &str,
        show_id: Option<&str>,
        suggested_comment: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id: CafePostId::for_post(post_id),
            post_id: post_id.to_string(),
            source: "naver_cafe".to_string(),
            source_name: article.source_name().to_string(),
            title: article.title.clone(),
            content: article.description.clone(),
            url: article.link.clone(),
            board_name: article.effective_board().unwrap_or_default().to_string(),
            show_id: show_id.unwrap_or_default().to_string(),
            suggested_comment,
            status: CafePostStatus::Pending,
            published_at: article.published_at.unwrap_or(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, link: &str, cafe_url: &str) -> CafeArticle {
        CafeArticle {
            title: title.to_string(),
            link: link.to_string(),
            description: "본문".to_string(),
            cafe_name: "임산부 카페".to_string(),
            cafe_url: cafe_url.to_string(),
            board_name: None,
            published_at: None,
        }
    }

    #[test]
    fn post_id_is_last_link_segment() {
        let a = article("t", "https://cafe.naver.com/imsanbu/12345?art=x", "https://cafe.naver.com/imsanbu");
        assert_eq!(a.post_id(), Some("12345"));
        assert_eq!(a.source_name(), "imsanbu");
    }

    #[test]
    fn bare_cafe_host_uses_default_source() {
        let a = article("t", "https://cafe.naver.com/x/1", "https://cafe.naver.com/");
        assert_eq!(a.source_name(), DEFAULT_SOURCE_NAME);
    }

    #[test]
    fn board_falls_back_to_title_prefix() {
        let a = article("[맛집] 성수동 추천", "l/1", "c");
        assert_eq!(a.effective_board(), Some("맛집"));

        let mut b = article("[잡담] 나솔 봤어요", "l/2", "c");
        b.board_name = Some("자유게시판".to_string());
        assert_eq!(b.effective_board(), Some("자유게시판"));

        assert_eq!(article("나솔 24기", "l/3", "c").effective_board(), None);
    }

    #[test]
    fn post_from_article() {
        let now = Timestamp::now();
        let a = article("나솔 24기 옥순", "https://cafe.naver.com/imsanbu/77", "https://cafe.naver.com/imsanbu");
        let post = CafePost::from_article(&a, "77", Some("nasolo"), "공감해요".to_string(), now);
        assert_eq!(post.id.as_str(), "naver_cafe_77");
        assert_eq!(post.source, "naver_cafe");
        assert_eq!(post.status, CafePostStatus::Pending);
        assert_eq!(post.published_at, now);
        assert_eq!(post.show_id, "nasolo");
    }
}
