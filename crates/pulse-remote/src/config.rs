use std::fmt;
use std::time::Duration;

/// A base URL or key this short is treated as unset.
const MIN_SETTING_LEN: usize = 5;

/// Connection settings for the remote collection. Built once by the caller
/// and handed to [`RemoteRecordService`](crate::RemoteRecordService).
#[derive(Clone, Default)]
pub struct RemoteConfig {
    /// REST root; the collection lives at `{base_url}/message`.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout. `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_key: Some(api_key.into()),
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        usable(&self.base_url)
    }

    pub fn api_key(&self) -> Option<&str> {
        usable(&self.api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.base_url().is_some() && self.api_key().is_some()
    }

    /// Full URL of a collection under the REST root.
    pub fn collection_url(&self, collection: &str) -> Option<String> {
        self.base_url()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), collection))
    }
}

fn usable(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| v.len() > MIN_SETTING_LEN)
}

// Keeps the key out of logs.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
