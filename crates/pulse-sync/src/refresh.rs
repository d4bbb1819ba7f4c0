use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use pulse_types::models::Record;

use crate::coordinator::SyncCoordinator;
use crate::feed::Feed;

/// Shared view of the latest feed plus a way to ask for a re-fetch.
///
/// Whichever fetch completes last overwrites the view; in-flight fetches are
/// never cancelled by newer ones.
#[derive(Clone)]
pub struct FeedHandle {
    trigger: Arc<Notify>,
    feed: Arc<watch::Sender<Feed>>,
}

impl FeedHandle {
    pub fn new(initial: Feed) -> Self {
        let (feed, _) = watch::channel(initial);
        Self {
            trigger: Arc::new(Notify::new()),
            feed: Arc::new(feed),
        }
    }

    pub fn latest(&self) -> Feed {
        self.feed.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Feed> {
        self.feed.subscribe()
    }

    /// Ask the scheduler for a re-fetch. Coalesces with other pending triggers.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    pub fn publish(&self, feed: Feed) {
        self.feed.send_replace(feed);
    }

    /// Show a just-posted record at the top before any re-fetch confirms it.
    pub fn publish_optimistic(&self, record: Record) {
        self.feed.send_modify(|feed| feed.records.insert(0, record));
    }

    /// Fetch now on the caller's task and publish the result.
    pub async fn refresh_now(&self, coordinator: &SyncCoordinator) -> Feed {
        let feed = coordinator.fetch().await;
        self.publish(feed.clone());
        feed
    }
}

/// Periodic re-fetch task. Fires once immediately, then every `period`, and
/// whenever [`FeedHandle::trigger`] is called, until cancelled.
pub struct RefreshScheduler {
    handle: FeedHandle,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn spawn(coordinator: SyncCoordinator, period: Duration, cancel: CancellationToken) -> Self {
        let handle = FeedHandle::new(Feed::empty(coordinator.configured_mode()));
        let task = tokio::spawn(run_refresh_loop(
            coordinator,
            handle.clone(),
            period,
            cancel.clone(),
        ));

        Self {
            handle,
            cancel,
            task,
        }
    }

    pub fn handle(&self) -> FeedHandle {
        self.handle.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop scheduling new fetches and wait for the loop to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!("Feed refresh task failed: {}", e);
        }
    }
}

async fn run_refresh_loop(
    coordinator: SyncCoordinator,
    handle: FeedHandle,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Feed refresh every {}s", period.as_secs());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Feed refresh stopped");
                break;
            }
            _ = interval.tick() => debug!("Scheduled feed refresh"),
            _ = handle.trigger.notified() => debug!("Triggered feed refresh"),
        }

        let coordinator = coordinator.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            handle.refresh_now(&coordinator).await;
        });
    }
}
