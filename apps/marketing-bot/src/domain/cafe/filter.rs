//! Which search hits are kept.

use super::CafeArticle;
use crate::domain::shared::Timestamp;

/// Boards skipped by default.
pub const DEFAULT_EXCLUDED_BOARDS: [&str; 3] = ["먹거리", "맛집", "프리마켓"];

/// Board and date window filter.
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    excluded_boards: Vec<String>,
    start: Timestamp,
    end: Timestamp,
}

impl ArticleFilter {
    /// Filter for the inclusive window `[start, end]`.
    #[must_use]
    pub const fn new(excluded_boards: Vec<String>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            excluded_boards,
            start,
            end,
        }
    }

    /// Whether the article is from an excluded board.
    #[must_use]
    pub fn is_excluded_board(&self, article: &CafeArticle) -> bool {
        article
            .effective_board()
            .is_some_and(|board| self.excluded_boards.iter().any(|ex| board.contains(ex.as_str())))
    }

    /// Whether the article was posted inside the window. Undated articles pass.
    #[must_use]
    pub fn is_in_range(&self, article: &CafeArticle) -> bool {
        article
            .published_at
            .is_none_or(|at| at >= self.start && at <= self.end)
    }

    /// Whether the article is kept.
    #[must_use]
    pub fn accepts(&self, article: &CafeArticle) -> bool {
        !self.is_excluded_board(article) && self.is_in_range(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn article(title: &str, published_at: Option<Timestamp>) -> CafeArticle {
        CafeArticle {
            title: title.to_string(),
            link: "https://cafe.naver.com/a/1".to_string(),
            description: String::new(),
            cafe_name: String::new(),
            cafe_url: String::new(),
            board_name: None,
            published_at,
        }
    }

    fn filter(now: Timestamp) -> ArticleFilter {
        ArticleFilter::new(
            DEFAULT_EXCLUDED_BOARDS.iter().map(ToString::to_string).collect(),
            now.plus(Duration::hours(-24)),
            now,
        )
    }

    #[test]
    fn excluded_boards_are_dropped() {
        let now = Timestamp::now();
        let f = filter(now);
        assert!(!f.accepts(&article("[맛집] 강남역", None)));
        assert!(!f.accepts(&article("[동네 프리마켓] 유모차", None)));
        assert!(f.accepts(&article("[수다] 나솔 24기", None)));
    }

    #[test]
    fn date_window_is_inclusive() {
        let now = Timestamp::now();
        let f = filter(now);
        assert!(f.accepts(&article("a", Some(now))));
        assert!(f.accepts(&article("b", Some(now.plus(Duration::hours(-24))))));
        assert!(!f.accepts(&article("c", Some(now.plus(Duration::hours(-25))))));
        assert!(f.accepts(&article("d", None)));
    }
}
