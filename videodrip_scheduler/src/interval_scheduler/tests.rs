use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use videodrip_models::session::{SessionMap, UserSession};
use videodrip_storage::memory::InMemorySessionStore;

use super::*;

const INTERVAL: Duration = Duration::from_secs(10);

type ReceivedMessages = Arc<Mutex<Vec<DeliveryMessage>>>;

#[derive(Clone)]
struct TestDeliveryChannel {
    received_messages: ReceivedMessages,
    fail: bool,
}

#[async_trait]
impl VideoDeliveryChannel for TestDeliveryChannel {
    async fn deliver(&self, _user_id: &UserId, message: &DeliveryMessage) -> anyhow::Result<()> {
        self.received_messages.lock().unwrap().push(message.clone());
        if self.fail {
            anyhow::bail!("transport unavailable");
        }
        Ok(())
    }
}

struct TestContext {
    received_messages: ReceivedMessages,
    store: Arc<InMemorySessionStore>,
    scheduler: IntervalDeliveryScheduler,
    user_id: UserId,
}

impl TestContext {
    fn new(catalog_len: usize) -> Self {
        Self::with_channel(catalog_len, false)
    }

    fn failing(catalog_len: usize) -> Self {
        Self::with_channel(catalog_len, true)
    }

    fn with_channel(catalog_len: usize, fail: bool) -> Self {
        let user_id = UserId::new("100");
        let received_messages = Arc::new(Mutex::new(Vec::new()));
        let delivery_channel = TestDeliveryChannel {
            received_messages: received_messages.clone(),
            fail,
        };
        let store = Arc::new(InMemorySessionStore::with_sessions(SessionMap::from([(
            user_id.clone(),
            UserSession::new(),
        )])));
        let scheduler = IntervalDeliveryScheduler::new(
            store.clone(),
            Arc::new(delivery_channel),
            catalog(catalog_len),
            DeliveryTiming {
                interval: INTERVAL,
                ..Default::default()
            },
        );

        Self {
            received_messages,
            store,
            scheduler,
            user_id,
        }
    }

    fn messages(&self) -> Vec<DeliveryMessage> {
        self.received_messages.lock().unwrap().clone()
    }

    async fn session(&self) -> Option<UserSession> {
        videodrip_storage::get(self.store.as_ref(), &self.user_id)
            .await
            .unwrap()
    }

    async fn set_paused(&self, paused: bool) {
        videodrip_storage::modify(self.store.as_ref(), &self.user_id, |s| s.paused = paused)
            .await
            .unwrap();
    }
}

fn catalog(len: usize) -> VideoCatalog {
    VideoCatalog::new((0..len).map(|i| format!("https://youtu.be/{i}")))
}

fn video(index: usize) -> DeliveryMessage {
    DeliveryMessage::Video {
        index,
        url: format!("https://youtu.be/{index}"),
    }
}

/// Sleeps past `ticks` more interval boundaries, landing halfway between two ticks.
async fn wait_ticks(ticks: u32) {
    tokio::time::sleep(INTERVAL * ticks - INTERVAL / 2).await;
}

#[tokio::test(start_paused = true)]
async fn delivers_whole_catalog_then_rating_prompt() {
    let ctx = TestContext::new(5);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    // Ticks at 0s..40s send videos, the tick at 50s finishes.
    wait_ticks(6).await;

    let expected: Vec<_> = (0..5)
        .map(video)
        .chain([DeliveryMessage::RatingPrompt])
        .collect();
    assert_eq!(ctx.messages(), expected);
    assert_eq!(ctx.session().await.unwrap().video_index, 5);
    assert!(!ctx.scheduler.is_scheduled(&ctx.user_id).await);

    wait_ticks(10).await;

    assert_eq!(ctx.messages().len(), 6);
    assert_eq!(ctx.session().await.unwrap().video_index, 5);
}

#[tokio::test(start_paused = true)]
async fn first_tick_is_immediate() {
    let ctx = TestContext::new(3);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(ctx.messages(), vec![video(0)]);
}

#[tokio::test(start_paused = true)]
async fn first_tick_waits_for_configured_delay() {
    let mut ctx = TestContext::new(3);
    ctx.scheduler = IntervalDeliveryScheduler::new(
        ctx.store.clone(),
        Arc::new(TestDeliveryChannel {
            received_messages: ctx.received_messages.clone(),
            fail: false,
        }),
        catalog(3),
        DeliveryTiming {
            interval: INTERVAL,
            first_delay: INTERVAL,
            ..Default::default()
        },
    );

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(INTERVAL / 2).await;
    assert!(ctx.messages().is_empty());

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(ctx.messages(), vec![video(0)]);
}

#[tokio::test(start_paused = true)]
async fn paused_session_keeps_index_until_resumed() {
    let ctx = TestContext::new(5);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    wait_ticks(2).await;
    assert_eq!(ctx.session().await.unwrap().video_index, 2);

    ctx.set_paused(true).await;
    tokio::time::sleep(INTERVAL * 3).await;

    assert_eq!(ctx.messages().len(), 2);
    assert_eq!(ctx.session().await.unwrap().video_index, 2);
    assert!(ctx.scheduler.is_scheduled(&ctx.user_id).await);

    ctx.set_paused(false).await;
    tokio::time::sleep(INTERVAL).await;

    assert_eq!(ctx.messages(), vec![video(0), video(1), video(2)]);
    assert_eq!(ctx.session().await.unwrap().video_index, 3);
}

#[tokio::test(start_paused = true)]
async fn failed_delivery_still_advances_index() {
    let ctx = TestContext::failing(3);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    wait_ticks(4).await;

    assert_eq!(ctx.session().await.unwrap().video_index, 3);
    assert_eq!(
        ctx.messages(),
        vec![video(0), video(1), video(2), DeliveryMessage::RatingPrompt]
    );
    assert!(!ctx.scheduler.is_scheduled(&ctx.user_id).await);
}

#[tokio::test(start_paused = true)]
async fn missing_session_is_a_noop_tick() {
    let ctx = TestContext::new(3);
    let stranger = UserId::new("200");

    ctx.scheduler.schedule(&stranger).await.unwrap();
    wait_ticks(3).await;

    assert!(ctx.messages().is_empty());
    assert!(ctx.scheduler.is_scheduled(&stranger).await);
    assert!(
        videodrip_storage::get(ctx.store.as_ref(), &stranger)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test(start_paused = true)]
async fn scheduling_twice_keeps_a_single_task() {
    let ctx = TestContext::new(5);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(INTERVAL / 2).await;
    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(INTERVAL * 2).await;

    assert_eq!(ctx.messages(), vec![video(0), video(1), video(2)]);
    assert_eq!(ctx.session().await.unwrap().video_index, 3);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_delivery() {
    let ctx = TestContext::new(5);

    let scheduled = ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(INTERVAL / 2).await;

    ctx.scheduler.cancel(&scheduled).await.unwrap();
    wait_ticks(5).await;

    assert_eq!(ctx.messages(), vec![video(0)]);
    assert!(!ctx.scheduler.is_scheduled(&ctx.user_id).await);
    assert!(ctx.scheduler.cancel(&scheduled).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn finished_task_can_be_scheduled_again() {
    let ctx = TestContext::new(1);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    wait_ticks(2).await;
    assert!(!ctx.scheduler.is_scheduled(&ctx.user_id).await);

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    tokio::time::sleep(INTERVAL / 2).await;

    assert_eq!(
        ctx.messages(),
        vec![
            video(0),
            DeliveryMessage::RatingPrompt,
            DeliveryMessage::RatingPrompt
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_all_tasks() {
    let ctx = TestContext::new(5);
    let other = UserId::new("300");

    ctx.scheduler.schedule(&ctx.user_id).await.unwrap();
    ctx.scheduler.schedule(&other).await.unwrap();
    tokio::time::sleep(INTERVAL / 2).await;

    ctx.scheduler.shutdown().await;
    wait_ticks(3).await;

    assert_eq!(ctx.messages(), vec![video(0)]);
    assert!(!ctx.scheduler.is_scheduled(&ctx.user_id).await);
    assert!(!ctx.scheduler.is_scheduled(&other).await);
}
