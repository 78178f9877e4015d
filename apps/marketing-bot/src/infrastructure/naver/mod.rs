//! Naver cafe article search adapter.
//!
//! Search hits wrap matched terms in `<b>` and escape HTML entities in both
//! title and description; both are cleaned before they reach the domain.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use pick_server::infrastructure::config::Secret;
use pick_server::infrastructure::retry::RetryConfig;

use crate::application::ports::{CafeSearchPort, NaverError};
use crate::domain::cafe::CafeArticle;
use crate::infrastructure::outbound::{OutboundError, send_with_retry};

/// Naver open API root.
pub const NAVER_API_URL: &str = "https://openapi.naver.com";
/// Largest page the cafe search accepts.
pub const MAX_DISPLAY: u32 = 100;
/// Largest 1-based start offset the cafe search accepts.
pub const MAX_START: u32 = 1000;

const SEARCH_PATH: &str = "/v1/search/cafearticle.json";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cafename: String,
    #[serde(default)]
    cafeurl: String,
}

impl From<SearchItem> for CafeArticle {
    fn from(item: SearchItem) -> Self {
        Self {
            title: strip_markup(&item.title),
            link: item.link,
            description: strip_markup(&item.description),
            cafe_name: strip_markup(&item.cafename),
            cafe_url: item.cafeurl,
            board_name: None,
            published_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_message: String,
}

/// Remove tags and decode the entities the search API emits.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
#[must_use]
pub fn strip_markup(raw: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"));

    re.replace_all(raw, "")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Cafe search backed by the Naver open API.
#[derive(Clone)]
pub struct NaverCafeClient {
    client: Client,
    credentials: Option<(Secret, Secret)>,
    base_url: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for NaverCafeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverCafeClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl NaverCafeClient {
    /// Create a client. Without credentials every search fails with `NotConfigured`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<(Secret, Secret)>,
        base_url: &str,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, NaverError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NaverError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Whether client id and secret are set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl CafeSearchPort for NaverCafeClient {
    async fn search(
        &self,
        keyword: &str,
        start: u32,
        display: u32,
    ) -> Result<Vec<CafeArticle>, NaverError> {
        let (client_id, client_secret) =
            self.credentials.as_ref().ok_or(NaverError::NotConfigured)?;
        let url = format!("{}{SEARCH_PATH}", self.base_url);
        let params = [
            ("query", keyword.to_string()),
            ("display", display.clamp(1, MAX_DISPLAY).to_string()),
            ("start", start.clamp(1, MAX_START).to_string()),
            ("sort", "date".to_string()),
        ];

        let response = send_with_retry("naver", &self.retry, || {
            self.client
                .get(&url)
                .query(&params)
                .header("X-Naver-Client-Id", client_id.expose())
                .header("X-Naver-Client-Secret", client_secret.expose())
        })
        .await
        .map_err(|e| match e {
            OutboundError::Transport(message) => NaverError::Transport { message },
            OutboundError::Status { status, body } => NaverError::Api {
                status,
                message: serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error_message)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body),
            },
        })?;

        let page: SearchResponse = response.json().await.map_err(|e| NaverError::Decode {
            message: e.to_string(),
        })?;
        tracing::debug!(keyword = %keyword, start, count = page.items.len(), "Cafe search page");
        Ok(page.items.into_iter().map(CafeArticle::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, configured: bool) -> NaverCafeClient {
        let retry = RetryConfig {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            multiplier: 2.0,
        };
        let credentials = configured.then(|| {
            (
                Secret::new("naver-id".to_string()),
                Secret::new("naver-secret".to_string()),
            )
        });
        NaverCafeClient::new(credentials, &server.uri(), Duration::from_secs(5), retry).unwrap()
    }

    #[test_case("<b>나는솔로</b> 24기", "나는솔로 24기"; "bold tags")]
    #[test_case("&quot;옥순&quot; &amp; 영수", "\"옥순\" & 영수"; "entities")]
    #[test_case("&amp;lt;", "&lt;"; "double escaped stays once decoded")]
    #[test_case("  plain  ", "plain"; "trimmed")]
    fn strips_markup(raw: &str, expected: &str) {
        assert_eq!(strip_markup(raw), expected);
    }

    #[tokio::test]
    async fn search_sends_credentials_and_cleans_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search/cafearticle.json"))
            .and(query_param("query", "나는솔로"))
            .and(query_param("sort", "date"))
            .and(query_param("display", "100"))
            .and(query_param("start", "1"))
            .and(header("X-Naver-Client-Id", "naver-id"))
            .and(header("X-Naver-Client-Secret", "naver-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "start": 1,
                "display": 1,
                "items": [{
                    "title": "[후기] <b>나는솔로</b> 24기 옥순",
                    "link": "https://cafe.naver.com/solocafe/12345",
                    "description": "이번 주 &quot;최종 선택&quot; 보셨나요",
                    "cafename": "나는솔로 팬카페",
                    "cafeurl": "https://cafe.naver.com/solocafe"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let articles = client(&server, true).search("나는솔로", 1, 500).await.unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "[후기] 나는솔로 24기 옥순");
        assert_eq!(a.description, "이번 주 \"최종 선택\" 보셨나요");
        assert_eq!(a.post_id(), Some("12345"));
        assert_eq!(a.source_name(), "solocafe");
        assert_eq!(a.effective_board(), Some("후기"));
    }

    #[tokio::test]
    async fn auth_failure_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errorMessage": "Authentication failed (인증에 실패했습니다.)",
                "errorCode": "024"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, true).search("x", 1, 10).await.unwrap_err();
        match err {
            NaverError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("Authentication failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_are_not_configured() {
        let server = MockServer::start().await;
        let naver = client(&server, false);
        assert!(!naver.is_configured());
        assert!(matches!(
            naver.search("x", 1, 10).await,
            Err(NaverError::NotConfigured)
        ));
    }

    proptest! {
        #[test]
        fn highlight_tags_are_removed(text in "[^<>&]{0,40}") {
            let marked = format!("<b>{text}</b>");
            prop_assert_eq!(strip_markup(&marked), text.trim());
        }
    }
}
