//! HTTP request DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::application::dto::{
    AnalyzeCommand, CafeSyncCommand, CrawlCommand, DEFAULT_HOURS_BACK, DEFAULT_MAX_RESULTS,
    MAX_HOURS_BACK,
};
use crate::domain::draft::DraftStatus;
use crate::domain::shared::Timestamp;
use crate::error::ServiceError;

/// Keywords given as an array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeywordList {
    /// `["나는솔로", "최강야구"]`
    Many(Vec<String>),
    /// `"나는솔로, 최강야구"`
    Joined(String),
}

impl Default for KeywordList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl KeywordList {
    /// Trimmed, non-empty keywords.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            Self::Many(list) => list,
            Self::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// `POST /api/youtube/crawl`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Search keywords.
    #[serde(default)]
    pub keywords: KeywordList,
    /// Videos kept per keyword.
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Upload window in hours.
    #[serde(default)]
    pub hours_back: Option<i64>,
}

impl CrawlRequest {
    /// Convert to a crawl command, filling defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for out-of-range numbers.
    pub fn into_command(self) -> Result<CrawlCommand, ServiceError> {
        let max_results = self.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if !(1..=50).contains(&max_results) {
            return Err(ServiceError::invalid("maxResults는 1~50 사이여야 합니다."));
        }
        let hours_back = self.hours_back.unwrap_or(DEFAULT_HOURS_BACK);
        if !(1..=MAX_HOURS_BACK).contains(&hours_back) {
            return Err(ServiceError::invalid(format!(
                "hoursBack은 1~{MAX_HOURS_BACK} 사이여야 합니다."
            )));
        }
        Ok(CrawlCommand {
            keywords: self.keywords.into_vec(),
            max_results,
            hours_back,
        })
    }
}

/// `POST /api/youtube/analyze`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    /// Video id.
    pub video_id: String,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(alias = "desc")]
    pub description: String,
    /// Channel display name.
    pub channel_name: String,
    /// Channel id.
    pub channel_id: String,
    /// Search keyword that found the video.
    pub keyword: Option<String>,
}

impl From<AnalyzeRequest> for AnalyzeCommand {
    fn from(r: AnalyzeRequest) -> Self {
        Self {
            video_id: r.video_id,
            title: r.title,
            description: r.description,
            channel_name: r.channel_name,
            channel_id: r.channel_id,
            keyword: r.keyword.filter(|k| !k.trim().is_empty()),
        }
    }
}

/// `POST /api/ai/screen-video`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScreenRequest {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(alias = "desc")]
    pub description: String,
}

/// `POST /api/youtube/run-daily-auto-mission`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRunRequest {
    /// Search keywords.
    #[serde(default)]
    pub keywords: KeywordList,
    /// Site root of the caller, logged with the run.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// `GET /api/admin/ai-missions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftListQuery {
    /// `PENDING`, `APPROVED`, `REJECTED` or `all`.
    pub status: Option<String>,
}

impl DraftListQuery {
    /// Status filter; `all` and absence mean no filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an unknown status.
    pub fn status(&self) -> Result<Option<DraftStatus>, ServiceError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("" | "all" | "ALL") => Ok(None),
            Some(raw) => DraftStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| ServiceError::invalid(format!("알 수 없는 상태입니다: {raw}"))),
        }
    }
}

/// `POST /api/admin/marketer/naver-cafe/crawl`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CafeCrawlRequest {
    /// Search keywords; defaults to the show list.
    pub keywords: Option<KeywordList>,
    /// Posts to store at most.
    pub limit: Option<usize>,
    /// Window start, `YYYY-MM-DD` or RFC 3339.
    pub start_date: Option<String>,
    /// Window end, `YYYY-MM-DD` or RFC 3339.
    pub end_date: Option<String>,
}

impl CafeCrawlRequest {
    /// Convert to a sync command.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a zero limit or an unreadable date.
    pub fn into_command(self) -> Result<CafeSyncCommand, ServiceError> {
        if self.limit == Some(0) {
            return Err(ServiceError::invalid("limit은 1 이상이어야 합니다."));
        }
        Ok(CafeSyncCommand {
            keywords: self.keywords.map(KeywordList::into_vec).unwrap_or_default(),
            limit: self.limit,
            start: parse_date(self.start_date.as_deref(), NaiveTime::MIN)?,
            end: parse_date(self.end_date.as_deref(), end_of_day())?,
        })
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Parse a bare date (at `time` KST) or a full RFC 3339 timestamp.
fn parse_date(raw: Option<&str>, time: NaiveTime) -> Result<Option<Timestamp>, ServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = Timestamp::parse(raw) {
        return Ok(Some(ts));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| Timestamp::from_kst(date, time))
        .map(Some)
        .ok_or_else(|| ServiceError::invalid(format!("날짜 형식이 올바르지 않습니다: {raw}")))
}

/// `GET /api/admin/marketer/naver-cafe/crawl`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    /// Progress record to poll; lists recent posts when absent.
    pub progress_id: Option<String>,
}

/// `DELETE /api/admin/marketer/naver-cafe/crawl`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletePostQuery {
    /// Stored post id.
    pub id: Option<String>,
}
