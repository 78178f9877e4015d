//! Resend email adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{EmailError, EmailMessage, EmailReceipt, EmailSenderPort};
use crate::infrastructure::config::Secret;
use crate::infrastructure::retry::{RetryConfig, RetryError, send_with_retry};

/// Resend API root.
pub const RESEND_API_URL: &str = "https://api.resend.com";
/// Sender used when the configured one is rejected or missing.
pub const FALLBACK_SENDER: &str = "리얼픽 <onboarding@resend.dev>";
const DEFAULT_SENDER_ADDRESS: &str = "onboarding@resend.dev";

/// Turn `RESEND_FROM_EMAIL` into a `from` header value.
///
/// A full address is used as is; a bare domain gets the `noreply` mailbox.
#[must_use]
pub fn format_from_email(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.contains('@') {
        raw.to_string()
    } else if raw.contains('.') && !raw.contains(char::is_whitespace) {
        format!("리얼픽 <noreply@{raw}>")
    } else {
        DEFAULT_SENDER_ADDRESS.to_string()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    #[serde(default)]
    message: String,
}

/// Email sender backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendEmailSender {
    client: Client,
    api_key: Secret,
    base_url: String,
    from: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for ResendEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailSender")
            .field("base_url", &self.base_url)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl ResendEmailSender {
    /// Create a sender.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        api_key: Secret,
        from_email: Option<&str>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmailError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: RESEND_API_URL.to_string(),
            from: format_from_email(from_email),
            retry,
        })
    }

    /// Point the sender at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sender address in use.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    async fn send_as(&self, from: &str, message: &EmailMessage) -> Result<EmailReceipt, EmailError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequest {
            from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            text: message.text.as_deref(),
        };
        let response = send_with_retry(
            "resend",
            &self.retry,
            || {
                self.client
                    .post(&url)
                    .bearer_auth(self.api_key.expose())
                    .json(&body)
            },
            |_| true,
        )
        .await
        .map_err(|e| match e {
            RetryError::Transport(e) => EmailError::Transport {
                message: e.to_string(),
            },
            RetryError::Status { status, body } => rejection(status, body),
        })?;

        let parsed: SendEmailResponse = response.json().await.map_err(|e| EmailError::Transport {
            message: e.to_string(),
        })?;
        Ok(EmailReceipt { id: parsed.id })
    }
}

/// Map a failed response to an error, keeping Resend's message when it sent one.
fn rejection(status: StatusCode, body: String) -> EmailError {
    let message = serde_json::from_str::<ResendErrorResponse>(&body)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);
    if matches!(status, StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY) {
        EmailError::SenderRejected { message }
    } else {
        EmailError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl EmailSenderPort for ResendEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailError> {
        match self.send_as(&self.from, message).await {
            Err(EmailError::SenderRejected { message: reason }) if self.from != FALLBACK_SENDER => {
                tracing::warn!(
                    from = %self.from,
                    reason = %reason,
                    "Sender rejected, retrying with fallback sender"
                );
                self.send_as(FALLBACK_SENDER, message).await
            }
            result => result,
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> EmailMessage {
        EmailMessage {
            to: "u1@example.com".to_string(),
            subject: "[리얼픽] 테스트".to_string(),
            html: "<p>hi</p>".to_string(),
            text: None,
        }
    }

    fn sender(server: &MockServer, from: Option<&str>) -> ResendEmailSender {
        let retry = RetryConfig {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            multiplier: 2.0,
        };
        ResendEmailSender::new(
            Secret::new("re_test".to_string()),
            from,
            Duration::from_secs(5),
            retry,
        )
        .unwrap()
        .with_base_url(server.uri())
    }

    #[test_case(Some("team@real-pick.com"), "team@real-pick.com"; "full address")]
    #[test_case(Some("리얼픽 <team@real-pick.com>"), "리얼픽 <team@real-pick.com>"; "named address")]
    #[test_case(Some("real-pick.com"), "리얼픽 <noreply@real-pick.com>"; "bare domain")]
    #[test_case(Some("nonsense"), "onboarding@resend.dev"; "garbage")]
    #[test_case(None, "onboarding@resend.dev"; "unset")]
    fn formats_sender(raw: Option<&str>, expected: &str) {
        assert_eq!(format_from_email(raw), expected);
    }

    #[tokio::test]
    async fn sends_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_partial_json(serde_json::json!({
                "from": "리얼픽 <noreply@real-pick.com>",
                "to": ["u1@example.com"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "email-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = sender(&server, Some("real-pick.com"))
            .send(&message())
            .await
            .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("email-1"));
    }

    #[tokio::test]
    async fn rejected_sender_falls_back_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"from": "team@real-pick.com"})))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "statusCode": 403,
                "message": "The real-pick.com domain is not verified",
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"from": FALLBACK_SENDER})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "email-2"})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = sender(&server, Some("team@real-pick.com"))
            .send(&message())
            .await
            .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("email-2"));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "email-3"})))
            .mount(&server)
            .await;

        let receipt = sender(&server, None).send(&message()).await.unwrap();
        assert_eq!(receipt.id.as_deref(), Some("email-3"));
    }

    #[tokio::test]
    async fn persistent_rate_limit_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "0")
                    .set_body_json(serde_json::json!({
                        "statusCode": 429,
                        "message": "Too many requests",
                    })),
            )
            .expect(3)
            .mount(&server)
            .await;

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            sender(&server, None).send(&message()),
        )
        .await
        .unwrap();
        match result {
            Err(EmailError::Rejected { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too many requests");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn validation_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "statusCode": 400,
                "message": "Invalid `to` field",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = sender(&server, None).send(&message()).await.unwrap_err();
        match err {
            EmailError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid `to` field");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
