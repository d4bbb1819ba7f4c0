use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use pulse_remote::RemoteRecordService;
use pulse_store::LocalCacheStore;
use pulse_types::events::{ConnectionMode, SyncEvent};
use pulse_types::models::{Record, sort_newest_first};

use crate::feed::Feed;

/// Decides where records come from and makes every write durable locally
/// before the network is touched.
#[derive(Clone)]
pub struct SyncCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    local: Arc<LocalCacheStore>,
    remote: Arc<RemoteRecordService>,

    /// Side-channel for write outcomes and refreshes. Nobody listening is fine.
    events: broadcast::Sender<SyncEvent>,
}

/// A write whose local half is done and whose remote half may still be running.
pub struct Submission {
    pub record: Record,
    pub stored_locally: bool,
    remote: JoinHandle<bool>,
}

impl Submission {
    /// Wait for the remote half. `true` when the remote accepted the record,
    /// or when no remote is configured and the local commit succeeded.
    pub async fn outcome(self) -> bool {
        self.remote.await.unwrap_or_else(|e| {
            error!("Remote sync task for {} failed: {}", self.record.id, e);
            false
        })
    }
}

impl SyncCoordinator {
    pub fn new(local: Arc<LocalCacheStore>, remote: Arc<RemoteRecordService>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(CoordinatorInner {
                local,
                remote,
                events,
            }),
        }
    }

    pub fn local(&self) -> &Arc<LocalCacheStore> {
        &self.inner.local
    }

    pub fn remote(&self) -> &Arc<RemoteRecordService> {
        &self.inner.remote
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Mode implied by configuration alone, before any call is made.
    pub fn configured_mode(&self) -> ConnectionMode {
        if self.inner.remote.is_configured() {
            ConnectionMode::Live
        } else {
            ConnectionMode::LocalOnly
        }
    }

    /// Newest-first records: the remote list when reachable, otherwise the
    /// local cache. The two are never merged.
    pub async fn get_records(&self) -> Vec<Record> {
        self.fetch().await.records
    }

    /// Like [`get_records`](Self::get_records), also reporting which mode the
    /// read ended up in.
    pub async fn fetch(&self) -> Feed {
        let (mode, mut records) = if self.inner.remote.is_configured() {
            match self.inner.remote.list().await {
                Ok(records) => (ConnectionMode::Live, records),
                Err(e) => {
                    warn!("Remote unavailable, reading local cache: {}", e);
                    (ConnectionMode::Degraded, self.load_local().await)
                }
            }
        } else {
            (ConnectionMode::LocalOnly, self.load_local().await)
        };

        sort_newest_first(&mut records);
        debug!("Fetched {} records ({:?})", records.len(), mode);
        self.publish(SyncEvent::FeedRefreshed {
            mode,
            count: records.len(),
        });

        Feed { mode, records }
    }

    /// Cache locally, then try the remote. Returns the remote result, or
    /// `true` when there is no remote and the local write went through.
    pub async fn post_record(&self, record: Record) -> bool {
        let stored = self.store_local(&record).await;
        self.sync_remote(&record, stored).await
    }

    /// Two-phase write: commit to the local cache, then hand the remote
    /// attempt to a background task and return. The remote outcome arrives
    /// as a [`SyncEvent`] and through [`Submission::outcome`].
    pub async fn submit(&self, record: Record) -> Submission {
        let stored_locally = self.store_local(&record).await;

        let this = self.clone();
        let pending = record.clone();
        let remote = tokio::spawn(async move { this.sync_remote(&pending, stored_locally).await });

        Submission {
            record,
            stored_locally,
            remote,
        }
    }

    async fn sync_remote(&self, record: &Record, stored_locally: bool) -> bool {
        if !self.inner.remote.is_configured() {
            if stored_locally {
                self.publish(SyncEvent::StoredLocally {
                    id: record.id.clone(),
                });
            }
            return stored_locally;
        }

        let synced = self.inner.remote.create(record).await;
        if synced {
            self.publish(SyncEvent::RemoteWriteSucceeded {
                id: record.id.clone(),
            });
        } else {
            warn!("Could not sync message {} to remote database", record.id);
            self.publish(SyncEvent::RemoteWriteFailed {
                id: record.id.clone(),
            });
        }
        synced
    }

    async fn load_local(&self) -> Vec<Record> {
        let local = self.inner.local.clone();
        tokio::task::spawn_blocking(move || local.load())
            .await
            .unwrap_or_else(|e| {
                error!("spawn_blocking join error: {}", e);
                Vec::new()
            })
    }

    async fn store_local(&self, record: &Record) -> bool {
        let local = self.inner.local.clone();
        let cached = record.clone();

        match tokio::task::spawn_blocking(move || local.prepend(&cached)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Failed to cache record {} locally: {}", record.id, e);
                false
            }
            Err(e) => {
                error!("spawn_blocking join error: {}", e);
                false
            }
        }
    }

    fn publish(&self, event: SyncEvent) {
        let _ = self.inner.events.send(event);
    }
}
