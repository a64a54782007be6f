use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::{RwLock, watch},
    task::{self, JoinHandle},
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use videodrip_models::{catalog::VideoCatalog, user::UserId};
use videodrip_storage::{SessionStore, StorageError};

use crate::{
    DeliveryScheduler, ScheduledDelivery,
    action::{TickAction, next_action},
    delivery::{DeliveryMessage, VideoDeliveryChannel},
};

#[derive(Debug, Clone, Copy)]
pub struct DeliveryTiming {
    pub interval: Duration,
    pub first_delay: Duration,
    pub cleanup_interval: Duration,
}

impl Default for DeliveryTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            first_delay: Duration::ZERO,
            cleanup_interval: Duration::from_secs(300),
        }
    }
}

struct ScheduledDeliveryHandle {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

struct CleanupTask(watch::Sender<()>);

type DeliveryTaskStore = RwLock<HashMap<UserId, ScheduledDeliveryHandle>>;

pub struct IntervalDeliveryScheduler {
    tasks: Arc<DeliveryTaskStore>,
    store: Arc<dyn SessionStore>,
    delivery_channel: Arc<dyn VideoDeliveryChannel>,
    catalog: VideoCatalog,
    timing: DeliveryTiming,
    cleanup_task: CleanupTask,
}

impl IntervalDeliveryScheduler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        delivery_channel: Arc<dyn VideoDeliveryChannel>,
        catalog: VideoCatalog,
        timing: DeliveryTiming,
    ) -> Self {
        let tasks = Arc::new(RwLock::new(HashMap::new()));
        let cleanup_task = Self::spawn_cleanup_task(Arc::clone(&tasks), timing.cleanup_interval);

        Self {
            tasks,
            store,
            delivery_channel,
            catalog,
            timing,
            cleanup_task,
        }
    }

    /// Cancels every running delivery task.
    pub async fn shutdown(&self) {
        let mut tasks = self.tasks.write().await;
        let count = tasks.len();
        for (_, handle) in tasks.drain() {
            handle.cancellation_token.cancel();
        }

        log::info!("Cancelled {count} delivery tasks");
    }
}

impl Drop for IntervalDeliveryScheduler {
    fn drop(&mut self) {
        let _ = self.cleanup_task.0.send(());
    }
}

impl IntervalDeliveryScheduler {
    fn create_delivery_task(&self, user_id: UserId) -> ScheduledDeliveryHandle {
        log::info!("Starting delivery task for user {user_id}");

        let cancellation_token = CancellationToken::new();
        let delivery = UserDelivery {
            user_id,
            store: Arc::clone(&self.store),
            delivery_channel: Arc::clone(&self.delivery_channel),
            catalog: self.catalog.clone(),
        };
        let start = Instant::now() + self.timing.first_delay;
        let interval = self.timing.interval;
        let task_token = cancellation_token.child_token();

        let task = task::spawn(async move {
            run_delivery(delivery, start, interval, task_token).await;
        });

        ScheduledDeliveryHandle {
            task,
            cancellation_token,
        }
    }

    fn spawn_cleanup_task(tasks: Arc<DeliveryTaskStore>, period: Duration) -> CleanupTask {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(());
        task::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(period) => {
                        Self::clean_finished_tasks(&tasks).await;
                    }
                    _ = shutdown_rx.changed() => {
                        log::info!("Cleanup task shutting down");
                        break;
                    }
                };
            }
        });

        CleanupTask(shutdown_tx)
    }

    async fn clean_finished_tasks(tasks: &DeliveryTaskStore) {
        let mut tasks = tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, handle| !handle.task.is_finished());
        let after = tasks.len();

        if before != after {
            log::info!("Cleaned up {} finished delivery tasks", before - after);
        }
    }
}

#[async_trait]
impl DeliveryScheduler for IntervalDeliveryScheduler {
    async fn schedule(&self, user_id: &UserId) -> anyhow::Result<ScheduledDelivery> {
        let mut tasks = self.tasks.write().await;

        let running = tasks
            .get(user_id)
            .is_some_and(|handle| !handle.task.is_finished());

        if running {
            log::info!("Delivery for user {user_id} is already running");
        } else {
            let handle = self.create_delivery_task(user_id.clone());
            tasks.insert(user_id.clone(), handle);
        }

        Ok(ScheduledDelivery::new(user_id.clone()))
    }

    async fn cancel(&self, scheduled_delivery: &ScheduledDelivery) -> anyhow::Result<()> {
        let handle = self.tasks.write().await.remove(&scheduled_delivery.user_id);

        match handle {
            Some(handle) => {
                handle.cancellation_token.cancel();
                handle.task.await?;
                Ok(())
            }
            None => anyhow::bail!(
                "No delivery scheduled for user {}",
                scheduled_delivery.user_id
            ),
        }
    }

    async fn is_scheduled(&self, user_id: &UserId) -> bool {
        self.tasks
            .read()
            .await
            .get(user_id)
            .is_some_and(|handle| !handle.task.is_finished())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TickOutcome {
    Sent(usize),
    Skipped,
    Finished,
    MissingSession,
}

struct UserDelivery {
    user_id: UserId,
    store: Arc<dyn SessionStore>,
    delivery_channel: Arc<dyn VideoDeliveryChannel>,
    catalog: VideoCatalog,
}

impl UserDelivery {
    async fn tick(&self) -> Result<TickOutcome, StorageError> {
        let user_id = &self.user_id;
        let Some(session) = videodrip_storage::get(self.store.as_ref(), user_id).await? else {
            log::warn!("Session for user {user_id} not found, skipping tick");
            return Ok(TickOutcome::MissingSession);
        };

        match next_action(&session, &self.catalog) {
            TickAction::Skip => {
                log::info!("User {user_id} has paused delivery");
                Ok(TickOutcome::Skipped)
            }
            TickAction::Send { index, url } => {
                let message = DeliveryMessage::Video {
                    index,
                    url: url.to_string(),
                };
                log::info!("Sending video {} to user {user_id}: {url}", index + 1);
                self.deliver(&message).await;

                videodrip_storage::modify(self.store.as_ref(), user_id, |session| {
                    session.video_index = session.video_index.max(index + 1);
                })
                .await?;

                Ok(TickOutcome::Sent(index))
            }
            TickAction::Finish => {
                log::info!("All videos have been sent to user {user_id}, asking for rating");
                self.deliver(&DeliveryMessage::RatingPrompt).await;
                Ok(TickOutcome::Finished)
            }
        }
    }

    async fn deliver(&self, message: &DeliveryMessage) {
        if let Err(e) = self.delivery_channel.deliver(&self.user_id, message).await {
            log::error!(
                "Failed to deliver {:?} to user {}: {e:#}",
                message,
                self.user_id
            );
        }
    }
}

async fn run_delivery(
    delivery: UserDelivery,
    start: Instant,
    interval: Duration,
    cancellation_token: CancellationToken,
) {
    let mut ticks = tokio::time::interval_at(start, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::info!("Delivery for user {} was cancelled", delivery.user_id);
                break;
            }
            _ = ticks.tick() => {
                match delivery.tick().await {
                    Ok(TickOutcome::Finished) => break,
                    Ok(outcome) => log::debug!("Tick for user {}: {:?}", delivery.user_id, outcome),
                    Err(e) => log::error!("Tick for user {} failed: {e}", delivery.user_id),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
