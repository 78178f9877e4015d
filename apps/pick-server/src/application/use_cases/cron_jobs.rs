//! Cron Jobs Use Case
//!
//! Scheduled work triggered through the cron endpoints: opening match
//! episodes on broadcast day, the daily new-mission digest, the marketing
//! bot's auto-mission run and the deadline sweep.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike};

use super::{NotificationsUseCase, ResultsUseCase, SendMissionNotificationUseCase};
use crate::application::dto::{
    AutoMissionReport, DeadlineSweepReport, DigestMission, DigestRunReport, DigestSlot,
    DispatchKind, EpisodeOpenReport, MissionNotificationRequest, OpenedEpisode,
};
use crate::application::ports::{EventPublisherPort, MarketingBotPort};
use crate::domain::catalog::active_shows;
use crate::domain::mission::{
    Mission, MissionFilter, MissionForm, MissionKind, MissionRepository, MissionStatus,
    update_mission,
};
use crate::domain::shared::Timestamp;
use crate::error::ServiceError;
use crate::infrastructure::metrics;

/// Digest slot for a KST hour: 11–13 noon, 18–20 evening.
#[must_use]
pub fn infer_slot(now: Timestamp) -> Option<DigestSlot> {
    match now.to_kst().hour() {
        11..=13 => Some(DigestSlot::Noon),
        18..=20 => Some(DigestSlot::Evening),
        _ => None,
    }
}

/// Creation window of a slot on the KST date of `now`.
#[must_use]
pub fn slot_window(slot: DigestSlot, now: Timestamp) -> Option<(Timestamp, Timestamp)> {
    let date = now.to_kst().date_naive();
    let (from, until) = match slot {
        DigestSlot::Noon => (0, 12),
        DigestSlot::Evening => (12, 19),
    };
    Some((
        Timestamp::from_kst(date, NaiveTime::from_hms_opt(from, 0, 0)?)?,
        Timestamp::from_kst(date, NaiveTime::from_hms_opt(until, 0, 0)?)?,
    ))
}

/// Use case for scheduled jobs.
pub struct CronJobsUseCase {
    missions: Arc<dyn MissionRepository>,
    results: Arc<ResultsUseCase>,
    dispatcher: Arc<SendMissionNotificationUseCase>,
    notifications: Arc<NotificationsUseCase>,
    marketing_bot: Arc<dyn MarketingBotPort>,
    event_publisher: Arc<dyn EventPublisherPort>,
}

impl CronJobsUseCase {
    /// Create a new `CronJobsUseCase`.
    pub const fn new(
        missions: Arc<dyn MissionRepository>,
        results: Arc<ResultsUseCase>,
        dispatcher: Arc<SendMissionNotificationUseCase>,
        notifications: Arc<NotificationsUseCase>,
        marketing_bot: Arc<dyn MarketingBotPort>,
        event_publisher: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            missions,
            results,
            dispatcher,
            notifications,
            marketing_bot,
            event_publisher,
        }
    }

    /// Open the next episode of every open match mission whose broadcast
    /// slot has started today.
    ///
    /// # Errors
    ///
    /// Returns error if listing missions fails. Failures on a single mission
    /// are logged and skipped.
    pub async fn open_match_episodes(
        &self,
        now: Timestamp,
    ) -> Result<EpisodeOpenReport, ServiceError> {
        let filter = MissionFilter {
            status: Some(MissionStatus::Open),
            form: Some(MissionForm::Match),
            ..MissionFilter::default()
        };
        let candidates = self.missions.list(&filter).await.inspect_err(|_| {
            metrics::record_cron_run("match_episode_open", false);
        })?;

        let mut opened = Vec::new();
        for mut mission in candidates.iter().cloned() {
            let Some(episode_no) = mission.open_scheduled_episode(now) else {
                continue;
            };
            if let Err(e) = self.missions.save(&mut mission).await {
                tracing::error!("Failed to save mission {}: {}", mission.id(), e);
                continue;
            }
            tracing::info!(mission_id = %mission.id(), episode_no, "Episode opened by schedule");
            self.publish(&mut mission).await;
            opened.push(OpenedEpisode {
                mission_id: mission.id().to_string(),
                episode_no,
            });
        }

        metrics::record_cron_run("match_episode_open", true);
        Ok(EpisodeOpenReport {
            success: true,
            checked: candidates.len(),
            opened,
        })
    }

    /// Send the digest of missions created in a slot's window.
    ///
    /// Without a slot it is inferred from the KST hour; outside both
    /// windows nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns error if listing missions or dispatching fails.
    pub async fn daily_digest(
        &self,
        slot: Option<DigestSlot>,
        now: Timestamp,
    ) -> Result<DigestRunReport, ServiceError> {
        let Some(slot) = slot.or_else(|| infer_slot(now)) else {
            return Ok(DigestRunReport {
                success: true,
                message: Some("Not in notification window".to_string()),
                ..DigestRunReport::default()
            });
        };
        let (from, until) = slot_window(slot, now)
            .ok_or_else(|| ServiceError::invalid("Could not compute notification window"))?;

        // 1. Missions created in the window and still open
        let filter = MissionFilter {
            created_from: Some(from),
            created_until: Some(until),
            ..MissionFilter::default()
        };
        let missions: Vec<DigestMission> = self
            .missions
            .list(&filter)
            .await?
            .iter()
            .filter(|m| m.accepts_picks(now))
            .map(|m| DigestMission {
                id: m.id().to_string(),
                title: m.title().to_string(),
                category: m.category().to_string(),
                show_id: m.show_id().map(str::to_string),
            })
            .collect();
        if missions.is_empty() {
            metrics::record_cron_run("daily_digest", true);
            return Ok(DigestRunReport {
                success: true,
                slot: Some(slot),
                message: Some("No missions in window".to_string()),
                ..DigestRunReport::default()
            });
        }

        // 2. Dispatch one digest
        let mission_count = missions.len();
        let report = self
            .dispatcher
            .execute(MissionNotificationRequest {
                kind: DispatchKind::Batch,
                slot: Some(slot),
                missions,
                ..MissionNotificationRequest::default()
            })
            .await
            .inspect_err(|_| metrics::record_cron_run("daily_digest", false))?;

        metrics::record_cron_run("daily_digest", true);
        Ok(DigestRunReport {
            success: true,
            slot: Some(slot),
            mission_count,
            in_app_sent: report.notified,
            email_sent: report.sent,
            message: None,
        })
    }

    /// Ask the marketing bot to crawl and draft missions for active shows.
    ///
    /// # Errors
    ///
    /// Returns `UPSTREAM_FAILED` when the bot call fails.
    pub async fn daily_auto_mission(&self) -> Result<AutoMissionReport, ServiceError> {
        let keywords: Vec<String> = active_shows()
            .map(|s| s.display_name.to_string())
            .collect();

        let summary = match self
            .marketing_bot
            .run_daily_auto_mission(&keywords, self.dispatcher.settings().base_url())
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Failed to run daily auto mission: {}", e);
                metrics::record_cron_run("daily_auto_mission", false);
                return Err(e.into());
            }
        };

        tracing::info!(
            keywords = keywords.len(),
            collected = summary.total_collected,
            created = summary.total_missions_created,
            "Daily auto mission finished"
        );
        metrics::record_cron_run("daily_auto_mission", true);
        Ok(AutoMissionReport {
            success: true,
            keywords,
            summary,
        })
    }

    /// Close unsettled missions past their deadline and notify their
    /// participants once.
    ///
    /// Majority missions are tallied first, which settles them.
    ///
    /// # Errors
    ///
    /// Returns error if listing missions fails. Failures on a single mission
    /// are logged and skipped.
    pub async fn deadline_sweep(&self, now: Timestamp) -> Result<DeadlineSweepReport, ServiceError> {
        let due: Vec<Mission> = self
            .missions
            .list(&MissionFilter::default())
            .await
            .inspect_err(|_| metrics::record_cron_run("deadline_sweep", false))?
            .into_iter()
            .filter(|m| {
                m.status() != MissionStatus::Settled && now >= m.deadline() && !m.deadline_notified()
            })
            .collect();

        let mut report = DeadlineSweepReport {
            success: true,
            ..DeadlineSweepReport::default()
        };
        for mut mission in due {
            match self.close_and_notify(&mut mission, now).await {
                Ok(outcome) => {
                    report.closed += usize::from(outcome.closed);
                    report.settled += usize::from(outcome.settled);
                    report.notified += usize::from(outcome.notified);
                }
                Err(e) => {
                    tracing::error!("Failed to sweep mission {}: {}", mission.id(), e);
                }
            }
        }

        report.pruned = match self.notifications.prune_read(now).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("Failed to prune notifications: {}", e);
                0
            }
        };

        metrics::record_cron_run("deadline_sweep", true);
        Ok(report)
    }

    async fn close_and_notify(
        &self,
        mission: &mut Mission,
        now: Timestamp,
    ) -> Result<SweepOutcome, ServiceError> {
        let mut outcome = SweepOutcome::default();

        // 1. Tally and settle majority missions
        if !mission.form().is_match() {
            self.results.refresh_tally(mission, now).await?;
            outcome.settled = mission.status() == MissionStatus::Settled
                && mission.kind() == MissionKind::Majority;
        }

        // 2. Close whatever is still open and claim the notification
        let id = mission.id().clone();
        let (saved, (closed, notify)) = update_mission(self.missions.as_ref(), &id, |current| {
            let closed = current.status() == MissionStatus::Open;
            if closed {
                current.close()?;
            }
            Ok::<_, ServiceError>((closed, current.mark_deadline_notified()))
        })
        .await?
        .ok_or_else(|| ServiceError::not_found("Mission", &id))?;
        *mission = saved;
        outcome.closed = closed;

        // 3. Notify participants once
        if notify {
            let report = self
                .dispatcher
                .execute(MissionNotificationRequest {
                    kind: DispatchKind::Deadline,
                    mission_id: Some(mission.id().to_string()),
                    mission_title: Some(mission.title().to_string()),
                    category: Some(mission.category().to_string()),
                    show_id: mission.show_id().map(str::to_string),
                    creator_id: Some(mission.creator_id().to_string()),
                    ..MissionNotificationRequest::default()
                })
                .await?;
            outcome.notified = report.notified > 0;
        }

        self.publish(mission).await;
        Ok(outcome)
    }

    async fn publish(&self, mission: &mut Mission) {
        let events = mission.drain_events();
        if events.is_empty() {
            return;
        }
        if let Err(e) = self.event_publisher.publish_mission_events(events).await {
            tracing::error!("Failed to publish events: {}", e);
        }
    }
}

#[derive(Debug, Default)]
struct SweepOutcome {
    closed: bool,
    settled: bool,
    notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use test_case::test_case;

    use crate::application::ports::{
        AutoMissionSummary, EmailReceipt, MarketingBotError, MockEmailSenderPort,
        MockMarketingBotPort,
    };
    use crate::application::use_cases::test_support::{self, Fixture};
    use crate::domain::mission::{BroadcastSchedule, EpisodeStatus, MissionEvent};
    use crate::domain::shared::UserId;
    use crate::error::ErrorCode;

    fn kst(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Timestamp::from_kst(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(h, min, 0).unwrap(),
        )
        .unwrap()
    }

    fn quiet_email() -> Arc<MockEmailSenderPort> {
        let mut email = MockEmailSenderPort::new();
        email.expect_send().returning(|_| Ok(EmailReceipt::default()));
        Arc::new(email)
    }

    fn idle_bot() -> Arc<MockMarketingBotPort> {
        Arc::new(MockMarketingBotPort::new())
    }

    #[test_case(kst(2026, 3, 2, 11, 0), Some(DigestSlot::Noon); "eleven is noon")]
    #[test_case(kst(2026, 3, 2, 13, 59), Some(DigestSlot::Noon); "late lunch is noon")]
    #[test_case(kst(2026, 3, 2, 19, 0), Some(DigestSlot::Evening); "seven pm is evening")]
    #[test_case(kst(2026, 3, 2, 15, 0), None; "afternoon is outside")]
    #[test_case(kst(2026, 3, 2, 2, 0), None; "night is outside")]
    fn slot_is_inferred_from_kst_hour(now: Timestamp, expected: Option<DigestSlot>) {
        assert_eq!(infer_slot(now), expected);
    }

    #[test]
    fn evening_window_is_noon_to_seven() {
        let (from, until) = slot_window(DigestSlot::Evening, kst(2026, 3, 2, 19, 30)).unwrap();
        assert_eq!(from, kst(2026, 3, 2, 12, 0));
        assert_eq!(until, kst(2026, 3, 2, 19, 0));
    }

    #[tokio::test]
    async fn episode_opens_once_on_broadcast_day() {
        let fx = Fixture::new().await;
        // 2026-03-04 is a Wednesday
        let created = kst(2026, 3, 1, 10, 0);
        let mut cmd = test_support::match_command(UserId::new("creator"));
        cmd.broadcast = Some(BroadcastSchedule::new(
            Weekday::Wed,
            NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        ));
        cmd.deadline = kst(2026, 6, 1, 0, 0);
        let mut mission = Mission::create(cmd, created).unwrap();
        mission.drain_events();
        fx.missions.save(&mut mission).await.unwrap();

        let cron = fx.cron_jobs(idle_bot(), quiet_email());

        let before = cron.open_match_episodes(kst(2026, 3, 4, 22, 0)).await.unwrap();
        assert!(before.opened.is_empty());

        let report = cron.open_match_episodes(kst(2026, 3, 4, 22, 45)).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.opened.len(), 1);
        let opened_ep = report.opened[0].episode_no;

        let again = cron.open_match_episodes(kst(2026, 3, 4, 23, 50)).await.unwrap();
        assert!(again.opened.is_empty());

        let stored = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();
        assert_eq!(stored.episode_status(opened_ep), Some(EpisodeStatus::Open));
        assert!(fx
            .events
            .published()
            .iter()
            .any(|e| matches!(e, MissionEvent::EpisodeStatusChanged(_))));
    }

    #[tokio::test]
    async fn digest_outside_window_is_a_no_op() {
        let fx = Fixture::new().await;
        let report = fx
            .cron_jobs(idle_bot(), Arc::new(MockEmailSenderPort::new()))
            .daily_digest(None, kst(2026, 3, 2, 16, 0))
            .await
            .unwrap();
        assert_eq!(report.message.as_deref(), Some("Not in notification window"));
        assert_eq!(report.mission_count, 0);
    }

    #[tokio::test]
    async fn noon_digest_lists_morning_missions() {
        let fx = Fixture::new().await;
        let mut cmd = test_support::binary_command(UserId::new("creator"));
        cmd.deadline = kst(2026, 3, 9, 0, 0);
        let mut morning = Mission::create(cmd.clone(), kst(2026, 3, 2, 9, 0)).unwrap();
        let mut yesterday = Mission::create(cmd, kst(2026, 3, 1, 9, 0)).unwrap();
        fx.missions.save(&mut morning).await.unwrap();
        fx.missions.save(&mut yesterday).await.unwrap();

        let report = fx
            .cron_jobs(idle_bot(), quiet_email())
            .daily_digest(None, kst(2026, 3, 2, 12, 5))
            .await
            .unwrap();
        assert_eq!(report.slot, Some(DigestSlot::Noon));
        assert_eq!(report.mission_count, 1);
        assert_eq!(report.in_app_sent, 4);
        assert_eq!(report.email_sent, 4);
    }

    #[tokio::test]
    async fn empty_window_reports_no_missions() {
        let fx = Fixture::new().await;
        let report = fx
            .cron_jobs(idle_bot(), Arc::new(MockEmailSenderPort::new()))
            .daily_digest(Some(DigestSlot::Evening), kst(2026, 3, 2, 19, 0))
            .await
            .unwrap();
        assert_eq!(report.message.as_deref(), Some("No missions in window"));
    }

    #[tokio::test]
    async fn auto_mission_sends_active_show_names() {
        let fx = Fixture::new().await;
        let mut bot = MockMarketingBotPort::new();
        bot.expect_run_daily_auto_mission()
            .withf(|keywords, base_url| {
                keywords.iter().any(|k| k == "나는 솔로") && base_url == "https://real-pick.test"
            })
            .times(1)
            .returning(|_, _| {
                Ok(AutoMissionSummary {
                    total_collected: 12,
                    total_screened: 4,
                    total_missions_created: 3,
                })
            });

        let report = fx
            .cron_jobs(Arc::new(bot), quiet_email())
            .daily_auto_mission()
            .await
            .unwrap();
        assert_eq!(report.summary.total_missions_created, 3);
    }

    #[tokio::test]
    async fn auto_mission_failure_is_bad_gateway() {
        let fx = Fixture::new().await;
        let mut bot = MockMarketingBotPort::new();
        bot.expect_run_daily_auto_mission().returning(|_, _| {
            Err(MarketingBotError::Upstream {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let err = fx
            .cron_jobs(Arc::new(bot), quiet_email())
            .daily_auto_mission()
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UpstreamFailed);
    }

    #[tokio::test]
    async fn sweep_settles_majority_and_notifies_once() {
        let fx = Fixture::new().await;
        let mission =
            test_support::majority_with_votes(&fx, &[("u1", "예"), ("u2", "아니오"), ("u3", "예")])
                .await;
        let predict = test_support::expired_binary(&fx).await;

        let mut email = MockEmailSenderPort::new();
        email
            .expect_send()
            .times(3)
            .returning(|_| Ok(EmailReceipt::default()));
        let cron = fx.cron_jobs(idle_bot(), Arc::new(email));

        let report = cron.deadline_sweep(Timestamp::now()).await.unwrap();
        assert_eq!(report.settled, 1);
        assert_eq!(report.closed, 1);
        // The predict mission has no participants
        assert_eq!(report.notified, 1);

        let settled = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();
        assert_eq!(settled.status(), MissionStatus::Settled);
        assert!(settled.deadline_notified());
        let closed = fx.missions.find_by_id(predict.id()).await.unwrap().unwrap();
        assert_eq!(closed.status(), MissionStatus::Closed);

        let second = cron.deadline_sweep(Timestamp::now()).await.unwrap();
        assert_eq!(second, DeadlineSweepReport {
            success: true,
            ..DeadlineSweepReport::default()
        });
    }

    #[tokio::test]
    async fn sweep_skips_missions_settled_before_deadline() {
        let fx = Fixture::new().await;
        let mission = test_support::binary_predict(&fx).await;
        fx.submit_pick()
            .submit_pick(mission.id(), &UserId::new("u1"), "예")
            .await
            .unwrap();
        fx.settle_mission()
            .submit_answer(mission.id(), &UserId::new("creator"), "예")
            .await
            .unwrap();

        let mut email = MockEmailSenderPort::new();
        email.expect_send().never();
        let cron = fx.cron_jobs(idle_bot(), Arc::new(email));

        let after_deadline = Timestamp::now().plus(chrono::Duration::days(2));
        let report = cron.deadline_sweep(after_deadline).await.unwrap();
        assert_eq!(report.closed, 0);
        assert_eq!(report.notified, 0);

        let stored = fx.missions.find_by_id(mission.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), MissionStatus::Settled);
        assert!(!stored.deadline_notified());
    }
}
