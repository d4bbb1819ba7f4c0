use serde::{Deserialize, Serialize};

/// Where the feed came from on a given evaluation. Derived per call, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// No remote configured; everything goes through the local cache.
    LocalOnly,
    /// Remote configured and the last call reached it.
    Live,
    /// Remote configured but this call failed and fell back to the local cache.
    Degraded,
}

impl ConnectionMode {
    pub fn is_configured(self) -> bool {
        !matches!(self, Self::LocalOnly)
    }
}

/// Side-channel notifications published by the sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SyncEvent {
    /// The remote collection accepted the record
    RemoteWriteSucceeded { id: String },

    /// The remote write failed; the record is kept in the local cache only
    RemoteWriteFailed { id: String },

    /// No remote configured, the local commit was the whole write
    StoredLocally { id: String },

    /// A feed fetch completed
    FeedRefreshed { mode: ConnectionMode, count: usize },
}
