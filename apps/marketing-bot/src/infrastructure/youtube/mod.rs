//! YouTube Data API v3 adapter.
//!
//! A keyword search costs three calls: `search` for ids and snippets, then
//! `videos` for statistics and durations, then `channels` for subscriber
//! counts. Statistics arrive as decimal strings.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use pick_server::infrastructure::config::Secret;
use pick_server::infrastructure::retry::RetryConfig;

use crate::application::ports::{YouTubeError, YouTubePort};
use crate::domain::shared::{ChannelId, Timestamp, VideoId};
use crate::domain::video::VideoSnapshot;
use crate::infrastructure::outbound::{OutboundError, send_with_retry};

/// YouTube Data API root.
pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
/// Most results a single search page returns.
pub const MAX_SEARCH_RESULTS: u32 = 50;

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    channel_title: String,
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    statistics: Statistics,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
    subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

fn count(raw: Option<&String>) -> u64 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn pick_thumbnail(thumbnails: &HashMap<String, Thumbnail>) -> Option<String> {
    ["medium", "high", "default"]
        .iter()
        .find_map(|size| thumbnails.get(*size))
        .map(|t| t.url.clone())
}

/// Video search backed by the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: Option<Secret>,
    base_url: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Create a client. Without a key every search fails with `NotConfigured`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        api_key: Option<Secret>,
        base_url: &str,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, YouTubeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| YouTubeError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Whether an API key is set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, YouTubeError> {
        let key = self.api_key.as_ref().ok_or(YouTubeError::NotConfigured)?;
        let url = format!("{}/{resource}", self.base_url);

        let response = send_with_retry("youtube", &self.retry, || {
            self.client
                .get(&url)
                .query(params)
                .query(&[("key", key.expose())])
        })
        .await
        .map_err(|e| match e {
            OutboundError::Transport(message) => YouTubeError::Transport { message },
            OutboundError::Status { status, body } => YouTubeError::Api {
                status,
                message: serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body),
            },
        })?;

        response.json::<T>().await.map_err(|e| YouTubeError::Decode {
            message: e.to_string(),
        })
    }

    async fn search(
        &self,
        keyword: &str,
        published_after: Timestamp,
        max_results: u32,
    ) -> Result<Vec<SearchItem>, YouTubeError> {
        let published_after = published_after
            .as_datetime()
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let params = [
            ("part", "snippet".to_string()),
            ("q", keyword.to_string()),
            ("type", "video".to_string()),
            ("order", "date".to_string()),
            ("regionCode", "KR".to_string()),
            ("relevanceLanguage", "ko".to_string()),
            ("publishedAfter", published_after),
            ("maxResults", max_results.clamp(1, MAX_SEARCH_RESULTS).to_string()),
        ];
        let page: ListResponse<SearchItem> = self.get("search", &params).await?;
        Ok(page.items)
    }

    async fn video_details(&self, ids: &[&str]) -> Result<HashMap<String, VideoItem>, YouTubeError> {
        let params = [
            ("part", "statistics,contentDetails".to_string()),
            ("id", ids.join(",")),
        ];
        let page: ListResponse<VideoItem> = self.get("videos", &params).await?;
        Ok(page.items.into_iter().map(|v| (v.id.clone(), v)).collect())
    }

    async fn subscriber_counts(&self, ids: &[&str]) -> Result<HashMap<String, u64>, YouTubeError> {
        let params = [("part", "statistics".to_string()), ("id", ids.join(","))];
        let page: ListResponse<ChannelItem> = self.get("channels", &params).await?;
        Ok(page
            .items
            .into_iter()
            .map(|c| (c.id, count(c.statistics.subscriber_count.as_ref())))
            .collect())
    }
}

#[async_trait]
impl YouTubePort for YouTubeClient {
    async fn search_videos(
        &self,
        keyword: &str,
        published_after: Timestamp,
        max_results: u32,
    ) -> Result<Vec<VideoSnapshot>, YouTubeError> {
        // 1. Search
        let hits: Vec<(String, Snippet)> = self
            .search(keyword, published_after, max_results)
            .await?
            .into_iter()
            .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
            .collect();
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        // 2. Statistics and channels
        let video_ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
        let mut details = self.video_details(&video_ids).await?;

        let mut channel_ids: Vec<&str> = hits
            .iter()
            .map(|(_, s)| s.channel_id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        channel_ids.sort_unstable();
        channel_ids.dedup();
        let subscribers = if channel_ids.is_empty() {
            HashMap::new()
        } else {
            self.subscriber_counts(&channel_ids).await?
        };

        // 3. Merge
        let videos: Vec<VideoSnapshot> = hits
            .into_iter()
            .map(|(id, snippet)| {
                let detail = details.remove(&id);
                let stats = detail.as_ref().map(|d| &d.statistics);
                VideoSnapshot {
                    subscriber_count: subscribers.get(&snippet.channel_id).copied().unwrap_or(0),
                    view_count: count(stats.and_then(|s| s.view_count.as_ref())),
                    like_count: count(stats.and_then(|s| s.like_count.as_ref())),
                    comment_count: count(stats.and_then(|s| s.comment_count.as_ref())),
                    duration: detail
                        .and_then(|d| d.content_details)
                        .and_then(|c| c.duration),
                    published_at: snippet
                        .published_at
                        .as_deref()
                        .and_then(|p| Timestamp::parse(p).ok()),
                    thumbnail: pick_thumbnail(&snippet.thumbnails),
                    video_id: VideoId::new(id),
                    title: snippet.title,
                    description: snippet.description,
                    channel_id: ChannelId::new(snippet.channel_id),
                    channel_name: snippet.channel_title,
                }
            })
            .collect();

        tracing::debug!(keyword = %keyword, count = videos.len(), "YouTube search finished");
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> YouTubeClient {
        let retry = RetryConfig {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            multiplier: 2.0,
        };
        YouTubeClient::new(
            key.map(|k| Secret::new(k.to_string())),
            &server.uri(),
            Duration::from_secs(5),
            retry,
        )
        .unwrap()
    }

    fn since() -> Timestamp {
        Timestamp::parse("2025-01-01T00:00:00Z").unwrap()
    }

    #[tokio::test]
    async fn search_merges_statistics_and_subscribers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "나는솔로"))
            .and(query_param("order", "date"))
            .and(query_param("regionCode", "KR"))
            .and(query_param("publishedAfter", "2025-01-01T00:00:00Z"))
            .and(query_param("key", "yt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": {"kind": "youtube#video", "videoId": "v1"},
                        "snippet": {
                            "title": "나는솔로 24기 옥순",
                            "description": "최종 선택",
                            "channelId": "c1",
                            "channelTitle": "촌장엔터테인먼트",
                            "publishedAt": "2025-01-02T03:04:05Z",
                            "thumbnails": {"medium": {"url": "https://i.ytimg.com/vi/v1/mqdefault.jpg"}}
                        }
                    },
                    {"id": {"kind": "youtube#channel"}, "snippet": {"title": "channel hit"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": "v1",
                    "statistics": {"viewCount": "1200", "likeCount": "34", "commentCount": "5"},
                    "contentDetails": {"duration": "PT12M3S"}
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .and(query_param("id", "c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "c1", "statistics": {"subscriberCount": "98000"}}]
            })))
            .mount(&server)
            .await;

        let videos = client(&server, Some("yt-key"))
            .search_videos("나는솔로", since(), 10)
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        let v = &videos[0];
        assert_eq!(v.video_id.as_str(), "v1");
        assert_eq!(v.channel_name, "촌장엔터테인먼트");
        assert_eq!(v.view_count, 1200);
        assert_eq!(v.like_count, 34);
        assert_eq!(v.subscriber_count, 98_000);
        assert_eq!(v.duration.as_deref(), Some("PT12M3S"));
        assert!(v.published_at.is_some());
        assert!(v.thumbnail.as_deref().is_some_and(|t| t.contains("mqdefault")));
    }

    #[tokio::test]
    async fn empty_search_skips_detail_calls() {
        let server = MockServer::start().await;
        Mock::given(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;
        Mock::given(path("/videos"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let videos = client(&server, Some("k"))
            .search_videos("솔로지옥", since(), 5)
            .await
            .unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn quota_errors_surface_the_api_message() {
        let server = MockServer::start().await;
        Mock::given(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, Some("k"))
            .search_videos("환승연애", since(), 5)
            .await
            .unwrap_err();
        match err {
            YouTubeError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let server = MockServer::start().await;
        let yt = client(&server, None);
        assert!(!yt.is_configured());
        let err = yt.search_videos("x", since(), 5).await.unwrap_err();
        assert!(matches!(err, YouTubeError::NotConfigured));
    }
}
