//! Send Mission Notification Use Case
//!
//! Creates in-app notifications and sends emails for new missions,
//! closed missions and daily digests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::dto::{
    DeliveryResult, DigestMission, DispatchKind, DispatchReport, MissionNotificationRequest,
};
use crate::application::email_templates::{
    DigestLine, MissionEmailParams, deadline_email, digest_email, new_mission_email,
};
use crate::application::ports::{EmailMessage, EmailSenderPort};
use crate::domain::catalog::{category_email_name, normalize_category, show_by_id};
use crate::domain::notification::{
    Notification, NotificationPreferences, NotificationRepository, NotificationType, email_allowed,
};
use crate::domain::pick::PickRepository;
use crate::domain::shared::{MissionId, UserId};
use crate::domain::user::{User, UserRepository};
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Users are loaded this many at a time.
pub const USER_CHUNK_SIZE: usize = 30;
/// Site root used when none is configured.
pub const DEFAULT_SITE_URL: &str = "https://real-pick.com";
/// Nickname used in emails when a user has none.
const FALLBACK_NICKNAME: &str = "사용자";

/// Delivery settings.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    base_url: String,
    send_interval: Duration,
}

impl NotificationSettings {
    /// Settings for a site root; a trailing slash is dropped.
    #[must_use]
    pub fn new(base_url: &str, send_interval: Duration) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            base_url: if trimmed.is_empty() {
                DEFAULT_SITE_URL.to_string()
            } else {
                trimmed.to_string()
            },
            send_interval,
        }
    }

    /// Site root without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn vote_url(&self, mission_id: &str) -> String {
        format!("{}/p-mission/{mission_id}/vote", self.base_url)
    }

    fn results_url(&self, mission_id: &str) -> String {
        format!("{}/p-mission/{mission_id}/results", self.base_url)
    }
}

/// `{category name} [{show}]`, or just the category name for unknown shows.
#[must_use]
pub fn display_category(category: &str, show_id: Option<&str>) -> String {
    let name = category_email_name(category);
    match show_id.and_then(show_by_id) {
        Some(show) => format!("{name} [{}]", show.display_name),
        None => name,
    }
}

/// One email queued for a recipient.
struct Outgoing {
    to: String,
    subject: String,
    html: String,
}

/// Use case for mission notification dispatch.
pub struct SendMissionNotificationUseCase {
    users: Arc<dyn UserRepository>,
    picks: Arc<dyn PickRepository>,
    notifications: Arc<dyn NotificationRepository>,
    email: Arc<dyn EmailSenderPort>,
    settings: NotificationSettings,
}

impl SendMissionNotificationUseCase {
    /// Create a new `SendMissionNotificationUseCase`.
    pub const fn new(
        users: Arc<dyn UserRepository>,
        picks: Arc<dyn PickRepository>,
        notifications: Arc<dyn NotificationRepository>,
        email: Arc<dyn EmailSenderPort>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            users,
            picks,
            notifications,
            email,
            settings,
        }
    }

    /// Delivery settings.
    #[must_use]
    pub const fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Dispatch a notification request.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` when mission fields are missing and storage
    /// errors as they occur. Individual email failures are reported in the
    /// result list instead.
    pub async fn execute(
        &self,
        request: MissionNotificationRequest,
    ) -> Result<DispatchReport, ServiceError> {
        let started = Instant::now();
        let kind = request.kind;
        let report = match kind {
            DispatchKind::New | DispatchKind::Deadline => self.dispatch_single(request).await,
            DispatchKind::Batch => self.dispatch_digest(request).await,
        }?;

        let label = kind_label(kind);
        metrics::record_dispatch_duration(label, started.elapsed().as_secs_f64());
        tracing::info!(
            kind = label,
            notified = report.notified,
            sent = report.sent,
            failed = report.failed.unwrap_or_default(),
            "Mission notification dispatched"
        );
        Ok(report)
    }

    async fn dispatch_single(
        &self,
        request: MissionNotificationRequest,
    ) -> Result<DispatchReport, ServiceError> {
        let deadline = request.kind == DispatchKind::Deadline;
        let (Some(mission_id), Some(title)) = (
            request.mission_id.filter(|s| !s.trim().is_empty()),
            request.mission_title.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(ServiceError::invalid("missionId and missionTitle are required"));
        };
        let category = request.category.unwrap_or_default();
        let creator_id = request
            .creator_id
            .filter(|s| !s.trim().is_empty())
            .map(UserId::new);

        // 1. Resolve recipients
        let prefs = self.preferences_by_user().await?;
        let recipient_ids = if deadline {
            self.deadline_recipients(&MissionId::new(mission_id.clone()), &prefs)
                .await?
        } else {
            self.new_mission_recipients(&category, creator_id.as_ref(), &prefs)
                .await?
        };
        if recipient_ids.is_empty() {
            return Ok(DispatchReport::nobody());
        }
        let users = self.load_users(&recipient_ids).await?;

        // 2. Build notifications and emails
        let display = display_category(&category, request.show_id.as_deref());
        let (kind, in_app_title, in_app_content, subject, link) = if deadline {
            (
                NotificationType::MissionClosed,
                "미션 마감 알림",
                format!("참여하신 미션 '{title}'이(가) 마감되었습니다. 결과를 확인해보세요!"),
                format!("[리얼픽] 참여하신 {display} 미션이 마감되었습니다: {title}"),
                self.settings.results_url(&mission_id),
            )
        } else {
            (
                NotificationType::NewMission,
                "새로운 미션 알림",
                format!("'{display}'에 새로운 미션 '{title}'이(가) 게시되었습니다!"),
                format!("[리얼픽] {display} 새 미션이 게시되었습니다!"),
                self.settings.vote_url(&mission_id),
            )
        };

        let mut in_app = Vec::with_capacity(users.len());
        let mut outgoing = Vec::new();
        for user in &users {
            in_app.push(Notification::new(
                user.id().clone(),
                kind,
                in_app_title,
                in_app_content.clone(),
                Some(MissionId::new(mission_id.clone())),
                creator_id.clone(),
            ));

            let Some(address) = user.email() else {
                continue;
            };
            if !email_allowed(prefs.get(user.id()), deadline) {
                tracing::debug!(user_id = %user.id(), "Email disabled by preferences");
                continue;
            }
            let params = MissionEmailParams {
                mission_title: &title,
                category: &category,
                display_category: &display,
                nickname: nickname(user),
                link_url: &link,
                base_url: self.settings.base_url(),
            };
            outgoing.push(Outgoing {
                to: address.to_string(),
                subject: subject.clone(),
                html: if deadline {
                    deadline_email(&params)
                } else {
                    new_mission_email(&params)
                },
            });
        }

        // 3. Store in-app notifications, then send
        self.notifications.save_all(&in_app).await?;
        metrics::record_notifications(if deadline { "deadline" } else { "new" }, in_app.len());

        Ok(self.send_all(outgoing, in_app.len()).await)
    }

    async fn dispatch_digest(
        &self,
        request: MissionNotificationRequest,
    ) -> Result<DispatchReport, ServiceError> {
        let missions: Vec<DigestMission> = request
            .missions
            .into_iter()
            .filter(|m| !m.id.trim().is_empty())
            .collect();
        if missions.is_empty() {
            return Ok(DispatchReport {
                success: true,
                message: Some("No missions to notify".to_string()),
                ..DispatchReport::default()
            });
        }
        let slot_label = request.slot.map_or("오늘의", |s| s.label());

        // 1. Every user with email enabled
        let prefs = self.preferences_by_user().await?;
        let users: Vec<User> = self
            .users
            .list_with_email()
            .await?
            .into_iter()
            .filter(|u| email_allowed(prefs.get(u.id()), false))
            .collect();
        if users.is_empty() {
            return Ok(DispatchReport::nobody());
        }

        // 2. One digest per user
        let lines: Vec<DigestLine> = missions
            .iter()
            .map(|m| DigestLine {
                title: m.title.clone(),
                display_category: display_category(&m.category, m.show_id.as_deref()),
                category: m.category.clone(),
                url: self.settings.vote_url(&m.id),
            })
            .collect();
        let subject = format!("[리얼픽] {slot_label} 새 미션 {}개가 게시되었습니다!", lines.len());
        let content = match missions.as_slice() {
            [only] => format!("새로운 미션 '{}'이(가) 게시되었습니다!", only.title),
            [first, rest @ ..] => format!(
                "새로운 미션 '{}' 외 {}개가 게시되었습니다!",
                first.title,
                rest.len()
            ),
            [] => String::new(),
        };

        let mut in_app = Vec::with_capacity(users.len());
        let mut outgoing = Vec::with_capacity(users.len());
        for user in &users {
            in_app.push(Notification::new(
                user.id().clone(),
                NotificationType::NewMission,
                format!("{slot_label} 새 미션 알림"),
                content.clone(),
                missions.first().map(|m| MissionId::new(m.id.clone())),
                None,
            ));
            if let Some(address) = user.email() {
                outgoing.push(Outgoing {
                    to: address.to_string(),
                    subject: subject.clone(),
                    html: digest_email(nickname(user), slot_label, &lines, self.settings.base_url()),
                });
            }
        }

        self.notifications.save_all(&in_app).await?;
        metrics::record_notifications("digest", in_app.len());

        Ok(self.send_all(outgoing, in_app.len()).await)
    }

    async fn new_mission_recipients(
        &self,
        category: &str,
        creator_id: Option<&UserId>,
        prefs: &HashMap<UserId, NotificationPreferences>,
    ) -> Result<Vec<UserId>, ServiceError> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        // Category subscribers
        if let Some(category) = normalize_category(category) {
            for p in self.notifications.subscribers(category).await? {
                if seen.insert(p.user_id.clone()) {
                    ids.push(p.user_id);
                }
            }
        }

        // Users who never set preferences get everything
        for user in self.users.list_with_email().await? {
            if !prefs.contains_key(user.id()) && seen.insert(user.id().clone()) {
                ids.push(user.id().clone());
            }
        }

        if let Some(creator) = creator_id
            && seen.insert(creator.clone())
        {
            ids.push(creator.clone());
        }
        Ok(ids)
    }

    async fn deadline_recipients(
        &self,
        mission_id: &MissionId,
        prefs: &HashMap<UserId, NotificationPreferences>,
    ) -> Result<Vec<UserId>, ServiceError> {
        Ok(self
            .picks
            .participants(mission_id)
            .await?
            .into_iter()
            .filter(|id| email_allowed(prefs.get(id), true))
            .collect())
    }

    async fn preferences_by_user(
        &self,
    ) -> Result<HashMap<UserId, NotificationPreferences>, ServiceError> {
        Ok(self
            .notifications
            .all_preferences()
            .await?
            .into_iter()
            .map(|p| (p.user_id.clone(), p))
            .collect())
    }

    async fn load_users(&self, ids: &[UserId]) -> Result<Vec<User>, ServiceError> {
        let mut users = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(USER_CHUNK_SIZE) {
            users.extend(self.users.find_many(chunk).await?);
        }
        Ok(users)
    }

    async fn send_all(&self, outgoing: Vec<Outgoing>, notified: usize) -> DispatchReport {
        let mut results = Vec::with_capacity(outgoing.len());
        for (i, mail) in outgoing.into_iter().enumerate() {
            if i > 0 && !self.settings.send_interval.is_zero() {
                tokio::time::sleep(self.settings.send_interval).await;
            }
            let message = EmailMessage {
                to: mail.to.clone(),
                subject: mail.subject,
                html: mail.html,
                text: None,
            };
            let result = match self.email.send(&message).await {
                Ok(receipt) => DeliveryResult {
                    success: true,
                    email: mail.to,
                    email_id: receipt.id,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(to = %mail.to, error = %e, "Failed to send notification email");
                    DeliveryResult {
                        success: false,
                        email: mail.to,
                        email_id: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            metrics::record_email(result.success);
            results.push(result);
        }

        let sent = results.iter().filter(|r| r.success).count();
        let total = results.len();
        DispatchReport {
            success: true,
            sent,
            total: Some(total),
            failed: Some(total - sent),
            notified,
            results,
            message: None,
        }
    }
}

fn nickname(user: &User) -> &str {
    let name = user.nickname();
    if name.is_empty() { FALLBACK_NICKNAME } else { name }
}

const fn kind_label(kind: DispatchKind) -> &'static str {
    match kind {
        DispatchKind::New => "new",
        DispatchKind::Deadline => "deadline",
        DispatchKind::Batch => "batch",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::DigestSlot;
    use crate::application::ports::{EmailError, EmailReceipt, MockEmailSenderPort};
    use crate::application::use_cases::test_support::{self, Fixture};
    use crate::domain::catalog::ShowCategory;
    use crate::error::ErrorCode;

    fn new_request(category: &str) -> MissionNotificationRequest {
        MissionNotificationRequest {
            mission_id: Some("m1".to_string()),
            mission_title: Some("영수의 선택은?".to_string()),
            category: Some(category.to_string()),
            show_id: Some("nasolo".to_string()),
            creator_id: Some("creator".to_string()),
            ..MissionNotificationRequest::default()
        }
    }

    #[test]
    fn display_category_includes_known_show() {
        assert_eq!(display_category("LOVE", Some("nasolo")), "로맨스 [나는 솔로]");
        assert_eq!(display_category("LOVE", Some("unknown")), "로맨스");
        assert_eq!(display_category("UNIFIED", None), "UNIFIED");
    }

    #[test]
    fn settings_trim_trailing_slash() {
        let settings = NotificationSettings::new("https://example.com/", Duration::ZERO);
        assert_eq!(settings.vote_url("m1"), "https://example.com/p-mission/m1/vote");
        let fallback = NotificationSettings::new("  ", Duration::ZERO);
        assert_eq!(fallback.base_url(), DEFAULT_SITE_URL);
    }

    #[tokio::test]
    async fn new_mission_reaches_subscribers_defaults_and_creator() {
        let fx = Fixture::new().await;
        // u1 follows LOVE, u2 opted into VICTORY only, u3 has no preferences
        test_support::set_preferences(&fx, "u1", true, true, &[ShowCategory::Love]).await;
        test_support::set_preferences(&fx, "u2", true, true, &[ShowCategory::Victory]).await;

        let mut email = MockEmailSenderPort::new();
        email
            .expect_send()
            .withf(|m| m.subject == "[리얼픽] 로맨스 [나는 솔로] 새 미션이 게시되었습니다!")
            .times(3)
            .returning(|_| {
                Ok(EmailReceipt {
                    id: Some("email-1".to_string()),
                })
            });

        let report = fx
            .send_notification(Arc::new(email))
            .execute(new_request("LOVE"))
            .await
            .unwrap();

        // u1, u3 and creator; u2 follows another category
        assert_eq!(report.notified, 3);
        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, Some(0));
        let inbox = fx.notifications.list_for_user(&UserId::new("u2"), 10).await.unwrap();
        assert!(inbox.is_empty());
        let inbox = fx.notifications.list_for_user(&UserId::new("u1"), 10).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationType::NewMission);
        assert_eq!(inbox[0].content, "'로맨스 [나는 솔로]'에 새로운 미션 '영수의 선택은?'이(가) 게시되었습니다!");
    }

    #[tokio::test]
    async fn disabled_email_still_gets_in_app() {
        let fx = Fixture::new().await;
        test_support::set_preferences(&fx, "u1", false, true, &[ShowCategory::Love]).await;

        let mut email = MockEmailSenderPort::new();
        email
            .expect_send()
            .withf(|m| m.to != "u1@example.com")
            .returning(|_| Ok(EmailReceipt::default()));

        let report = fx
            .send_notification(Arc::new(email))
            .execute(new_request("LOVE"))
            .await
            .unwrap();
        assert_eq!(report.notified, 4);
        assert_eq!(report.total, Some(3));
    }

    #[tokio::test]
    async fn deadline_goes_to_participants_who_allow_it() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        let submit = fx.submit_pick();
        for user in ["u1", "u2"] {
            submit
                .submit_pick(mission.id(), &UserId::new(user), "예")
                .await
                .unwrap();
        }
        test_support::set_preferences(&fx, "u2", true, false, &[]).await;

        let mut email = MockEmailSenderPort::new();
        email
            .expect_send()
            .withf(|m| m.to == "u1@example.com" && m.html.contains("/results"))
            .times(1)
            .returning(|_| {
                Err(EmailError::Rejected {
                    status: 400,
                    message: "bad".to_string(),
                })
            });

        let report = fx
            .send_notification(Arc::new(email))
            .execute(MissionNotificationRequest {
                kind: DispatchKind::Deadline,
                mission_id: Some(mission.id().to_string()),
                ..new_request("LOVE")
            })
            .await
            .unwrap();
        assert_eq!(report.notified, 1);
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, Some(1));
        assert!(!report.results[0].success);
    }

    #[tokio::test]
    async fn nobody_to_notify() {
        let fx = Fixture::new().await;
        let report = fx
            .send_notification(Arc::new(MockEmailSenderPort::new()))
            .execute(MissionNotificationRequest {
                kind: DispatchKind::Deadline,
                ..new_request("LOVE")
            })
            .await
            .unwrap();
        assert_eq!(report, DispatchReport::nobody());
    }

    #[tokio::test]
    async fn missing_mission_fields_are_rejected() {
        let fx = Fixture::new().await;
        let err = fx
            .send_notification(Arc::new(MockEmailSenderPort::new()))
            .execute(MissionNotificationRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn digest_sends_one_email_per_user() {
        let fx = Fixture::new().await;
        test_support::set_preferences(&fx, "u3", false, true, &[]).await;

        let mut email = MockEmailSenderPort::new();
        email
            .expect_send()
            .withf(|m| m.subject == "[리얼픽] 점심 새 미션 2개가 게시되었습니다!")
            .times(3)
            .returning(|_| Ok(EmailReceipt::default()));

        let report = fx
            .send_notification(Arc::new(email))
            .execute(MissionNotificationRequest {
                kind: DispatchKind::Batch,
                slot: Some(DigestSlot::Noon),
                missions: vec![
                    DigestMission {
                        id: "a".to_string(),
                        title: "첫 미션".to_string(),
                        category: "LOVE".to_string(),
                        show_id: None,
                    },
                    DigestMission {
                        id: "b".to_string(),
                        title: "둘째 미션".to_string(),
                        category: "STAR".to_string(),
                        show_id: Some("mr-trot3".to_string()),
                    },
                ],
                ..MissionNotificationRequest::default()
            })
            .await
            .unwrap();

        // creator, u1 and u2 have email and allow it; u3 opted out
        assert_eq!(report.sent, 3);
        let inbox = fx.notifications.list_for_user(&UserId::new("u1"), 10).await.unwrap();
        assert_eq!(inbox[0].content, "새로운 미션 '첫 미션' 외 1개가 게시되었습니다!");
    }
}
