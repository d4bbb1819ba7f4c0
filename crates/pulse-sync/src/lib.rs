pub mod coordinator;
pub mod enhance;
pub mod feed;
pub mod refresh;

pub use coordinator::{Submission, SyncCoordinator};
pub use enhance::{Enhancer, NoBackend, RewriteBackend};
pub use feed::Feed;
pub use refresh::{FeedHandle, RefreshScheduler};
