//! In-memory fixture shared by the use case tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{
    CommentsUseCase, CronJobsUseCase, DistributePointsUseCase, MissionsUseCase,
    NotificationSettings, NotificationsUseCase, ResultsUseCase, SendMissionNotificationUseCase,
    SettleMissionUseCase, SubmitPickUseCase, UsersUseCase,
};
use crate::application::ports::{
    EmailSenderPort, EventPublishError, EventPublisherPort, MarketingBotPort,
};
use crate::domain::catalog::ShowCategory;
use crate::domain::mission::{
    CreateMissionCommand, MatchCandidates, Mission, MissionEvent, MissionForm, MissionKind,
    MissionRepository, MissionStatus, RevealPolicy, SeasonType,
};
use crate::domain::notification::{NotificationPreferences, NotificationRepository};
use crate::domain::pick::{Pick, PickRepository};
use crate::domain::scoring::{MissionType, PointLog, PointLogMetadata};
use crate::domain::shared::{MissionId, Timestamp, UserId};
use crate::domain::user::{CreateUserCommand, User, UserRepository};
use crate::infrastructure::persistence::{
    InMemoryCommentRepository, InMemoryMissionRepository, InMemoryNotificationRepository,
    InMemoryPickRepository, InMemoryUserRepository,
};

/// Users seeded into every fixture. Nickname equals the id.
pub const SEEDED_USERS: [&str; 4] = ["creator", "u1", "u2", "u3"];

/// Publisher that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<MissionEvent>>,
}

impl RecordingEventPublisher {
    pub fn published(&self) -> Vec<MissionEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisherPort for RecordingEventPublisher {
    async fn publish_mission_events(
        &self,
        events: Vec<MissionEvent>,
    ) -> Result<(), EventPublishError> {
        self.events.lock().extend(events);
        Ok(())
    }
}

pub struct Fixture {
    pub missions: Arc<InMemoryMissionRepository>,
    pub picks: Arc<InMemoryPickRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub events: Arc<RecordingEventPublisher>,
}

impl Fixture {
    pub async fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        for id in SEEDED_USERS {
            let user = User::new(CreateUserCommand {
                id: Some(UserId::new(id)),
                email: Some(format!("{id}@example.com")),
                nickname: id.to_string(),
                avatar_url: None,
            })
            .unwrap();
            users.save(&user).await.unwrap();
        }

        Self {
            missions: Arc::new(InMemoryMissionRepository::new()),
            picks: Arc::new(InMemoryPickRepository::new()),
            users,
            comments: Arc::new(InMemoryCommentRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            events: Arc::new(RecordingEventPublisher::default()),
        }
    }

    pub fn distribute_points(&self) -> Arc<DistributePointsUseCase> {
        Arc::new(DistributePointsUseCase::new(
            self.missions.clone(),
            self.picks.clone(),
            self.users.clone(),
        ))
    }

    pub fn missions_use_case(&self) -> MissionsUseCase {
        MissionsUseCase::new(self.missions.clone(), self.users.clone(), self.events.clone())
    }

    pub fn submit_pick(&self) -> SubmitPickUseCase {
        SubmitPickUseCase::new(self.missions.clone(), self.picks.clone(), self.users.clone())
    }

    pub fn results(&self) -> ResultsUseCase {
        ResultsUseCase::new(
            self.missions.clone(),
            self.picks.clone(),
            self.distribute_points(),
            self.events.clone(),
        )
    }

    pub fn settle_mission(&self) -> SettleMissionUseCase {
        SettleMissionUseCase::new(
            self.missions.clone(),
            self.distribute_points(),
            self.events.clone(),
        )
    }

    pub fn comments_use_case(&self) -> CommentsUseCase {
        CommentsUseCase::new(self.comments.clone(), self.missions.clone(), self.users.clone())
    }

    pub fn users_use_case(&self) -> UsersUseCase {
        UsersUseCase::new(self.users.clone(), self.picks.clone())
    }

    pub fn send_notification(&self, email: Arc<dyn EmailSenderPort>) -> SendMissionNotificationUseCase {
        SendMissionNotificationUseCase::new(
            self.users.clone(),
            self.picks.clone(),
            self.notifications.clone(),
            email,
            NotificationSettings::new("https://real-pick.test", Duration::ZERO),
        )
    }

    pub fn cron_jobs(
        &self,
        bot: Arc<dyn MarketingBotPort>,
        email: Arc<dyn EmailSenderPort>,
    ) -> CronJobsUseCase {
        CronJobsUseCase::new(
            self.missions.clone(),
            Arc::new(self.results()),
            Arc::new(self.send_notification(email)),
            Arc::new(NotificationsUseCase::new(self.notifications.clone())),
            bot,
            self.events.clone(),
        )
    }
}

/// Realtime binary predict mission on 나는 솔로, closing tomorrow.
pub fn binary_command(creator: UserId) -> CreateMissionCommand {
    CreateMissionCommand {
        title: "영수는 옥순을 선택할까?".to_string(),
        description: None,
        kind: MissionKind::Predict,
        form: MissionForm::Binary,
        reveal_policy: RevealPolicy::Realtime,
        category: ShowCategory::Love,
        show_id: Some("nasolo".to_string()),
        season_type: SeasonType::All,
        season_number: None,
        creator_id: creator,
        options: vec!["예".to_string(), "아니오".to_string()],
        match_candidates: None,
        deadline: Timestamp::now().plus(chrono::Duration::days(1)),
        total_episodes: None,
        broadcast: None,
    }
}

/// Match mission without a broadcast slot, so episode 1 opens at once.
pub fn match_command(creator: UserId) -> CreateMissionCommand {
    CreateMissionCommand {
        title: "최종 커플은?".to_string(),
        kind: MissionKind::Predict,
        form: MissionForm::Match,
        options: Vec::new(),
        match_candidates: Some(MatchCandidates {
            left: vec!["영수".to_string(), "영호".to_string()],
            right: vec!["옥순".to_string(), "영숙".to_string()],
        }),
        total_episodes: Some(8),
        ..binary_command(creator)
    }
}

pub async fn save_new(fx: &Fixture, cmd: CreateMissionCommand) -> Mission {
    let mut mission = Mission::create(cmd, Timestamp::now()).unwrap();
    mission.drain_events();
    fx.missions.save(&mut mission).await.unwrap();
    mission
}

pub async fn binary_predict(fx: &Fixture) -> Mission {
    save_new(fx, binary_command(UserId::new("creator"))).await
}

pub async fn match_mission(fx: &Fixture) -> Mission {
    save_new(fx, match_command(UserId::new("creator"))).await
}

/// Store `cmd` as if it had been created earlier and its deadline passed.
async fn save_expired(fx: &Fixture, cmd: CreateMissionCommand) -> Mission {
    let created = Mission::create(cmd, Timestamp::now()).unwrap();
    let mut params = created.to_params();
    params.deadline = Timestamp::now().plus(chrono::Duration::minutes(-5));
    params.status = MissionStatus::Open;
    let mut mission = Mission::reconstitute(params);
    fx.missions.save(&mut mission).await.unwrap();
    mission
}

pub async fn expired_binary(fx: &Fixture) -> Mission {
    save_expired(fx, binary_command(UserId::new("creator"))).await
}

/// Majority mission past its deadline with `votes` already stored.
pub async fn majority_with_votes(fx: &Fixture, votes: &[(&str, &str)]) -> Mission {
    let cmd = CreateMissionCommand {
        kind: MissionKind::Majority,
        ..binary_command(UserId::new("creator"))
    };
    let mission = save_expired(fx, cmd).await;
    for (user, option) in votes {
        let pick = Pick::new(
            mission.id().clone(),
            UserId::new(*user),
            option,
            Timestamp::now(),
        )
        .unwrap();
        fx.picks.upsert_pick(pick).await.unwrap();
    }
    mission
}

pub async fn grant_points(fx: &Fixture, user: &str, points: i64) {
    fx.users
        .apply_point_log(PointLog::new(
            UserId::new(user),
            MissionId::new("seed"),
            MissionType::Mission1,
            points,
            "seed",
            PointLogMetadata::default(),
        ))
        .await
        .unwrap();
}

pub async fn set_preferences(
    fx: &Fixture,
    user: &str,
    email_enabled: bool,
    deadline_email_enabled: bool,
    categories: &[ShowCategory],
) {
    fx.notifications
        .save_preferences(&NotificationPreferences {
            user_id: UserId::new(user),
            email_enabled,
            deadline_email_enabled,
            categories: categories.to_vec(),
        })
        .await
        .unwrap();
}
