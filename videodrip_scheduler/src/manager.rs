use std::sync::Arc;

use videodrip_models::{
    catalog::VideoCatalog,
    session::{Rating, SessionState, UserSession},
    user::UserId,
};
use videodrip_storage::SessionStore;

use crate::DeliveryScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Created,
    Resumed,
    /// Every video was sent but no rating arrived, the prompt is sent again.
    AwaitingRating,
    AlreadyFinished,
}

impl StartOutcome {
    /// Whether delivery should be armed once the user has been greeted.
    pub fn needs_delivery(&self) -> bool {
        !matches!(self, StartOutcome::AlreadyFinished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    AlreadyPaused,
    Finished,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    Resumed,
    NotPaused,
    Finished,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    Recorded(Rating),
    NotFinished,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub sent: usize,
    pub total: usize,
}

/// Applies user commands to the stored sessions and keeps delivery tasks armed.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    scheduler: Arc<dyn DeliveryScheduler>,
    catalog: VideoCatalog,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        scheduler: Arc<dyn DeliveryScheduler>,
        catalog: VideoCatalog,
    ) -> Self {
        Self {
            store,
            scheduler,
            catalog,
        }
    }

    /// Creates the session on first start. An existing session is never reset.
    /// Delivery is armed separately with [`SessionManager::ensure_delivery`] so the
    /// caller can greet the user before the first video goes out.
    pub async fn start(&self, user_id: &UserId) -> anyhow::Result<StartOutcome> {
        let mut sessions = self.store.load().await?;

        let outcome = match sessions.get(user_id).map(|s| s.state(self.catalog.len())) {
            None => {
                sessions.insert(user_id.clone(), UserSession::new());
                self.store.save(&sessions).await?;
                log::info!("Created session for user {user_id}");
                StartOutcome::Created
            }
            Some(SessionState::Sending | SessionState::Paused) => StartOutcome::Resumed,
            Some(SessionState::AwaitingRating) => StartOutcome::AwaitingRating,
            Some(SessionState::Rated(_)) => StartOutcome::AlreadyFinished,
        };

        Ok(outcome)
    }

    pub async fn ensure_delivery(&self, user_id: &UserId) -> anyhow::Result<()> {
        self.scheduler.schedule(user_id).await?;
        Ok(())
    }

    pub async fn pause(&self, user_id: &UserId) -> anyhow::Result<PauseOutcome> {
        let mut sessions = self.store.load().await?;
        let Some(session) = sessions.get_mut(user_id) else {
            return Ok(PauseOutcome::NotStarted);
        };

        let outcome = match session.state(self.catalog.len()) {
            SessionState::Paused => PauseOutcome::AlreadyPaused,
            SessionState::Sending => {
                session.paused = true;
                self.store.save(&sessions).await?;
                log::info!("Paused delivery for user {user_id}");
                PauseOutcome::Paused
            }
            SessionState::AwaitingRating | SessionState::Rated(_) => PauseOutcome::Finished,
        };

        Ok(outcome)
    }

    /// Clears the pause flag and re-arms delivery, which does not survive restarts.
    /// A session paused at the end of the catalog resumes into the rating prompt.
    pub async fn resume(&self, user_id: &UserId) -> anyhow::Result<ResumeOutcome> {
        let mut sessions = self.store.load().await?;
        let Some(session) = sessions.get_mut(user_id) else {
            return Ok(ResumeOutcome::NotStarted);
        };

        let outcome = match session.state(self.catalog.len()) {
            SessionState::Paused => {
                session.paused = false;
                self.store.save(&sessions).await?;
                log::info!("Resumed delivery for user {user_id}");
                ResumeOutcome::Resumed
            }
            SessionState::Sending => ResumeOutcome::NotPaused,
            SessionState::AwaitingRating | SessionState::Rated(_) => {
                return Ok(ResumeOutcome::Finished);
            }
        };

        self.ensure_delivery(user_id).await?;
        Ok(outcome)
    }

    pub async fn rate(&self, user_id: &UserId, rating: Rating) -> anyhow::Result<RateOutcome> {
        let mut sessions = self.store.load().await?;
        let Some(session) = sessions.get_mut(user_id) else {
            return Ok(RateOutcome::NotStarted);
        };

        if !session.is_finished(self.catalog.len()) {
            return Ok(RateOutcome::NotFinished);
        }

        session.rating = Some(rating);
        self.store.save(&sessions).await?;
        log::info!("User {user_id} rated the videos {rating}");

        Ok(RateOutcome::Recorded(rating))
    }

    pub async fn status(&self, user_id: &UserId) -> anyhow::Result<Option<SessionStatus>> {
        let session = videodrip_storage::get(self.store.as_ref(), user_id).await?;
        let total = self.catalog.len();

        Ok(session.map(|session| SessionStatus {
            state: session.state(total),
            sent: session.video_index.min(total),
            total,
        }))
    }

    /// Arms delivery for every unrated session, returns how many were armed.
    /// Sessions waiting for a rating get the prompt again since nothing records
    /// whether it went out before the restart.
    pub async fn restore(&self) -> anyhow::Result<usize> {
        let sessions = self.store.load().await?;
        let mut restored = 0;

        for (user_id, session) in &sessions {
            if !session.state(self.catalog.len()).needs_delivery() {
                continue;
            }

            self.ensure_delivery(user_id).await?;
            restored += 1;
        }

        log::info!("Restored delivery for {restored} of {} sessions", sessions.len());
        Ok(restored)
    }
}
