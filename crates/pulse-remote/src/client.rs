use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use pulse_types::models::Record;

use crate::config::RemoteConfig;

/// Name of the remote collection resource.
pub const COLLECTION: &str = "message";

/// Any failure to reach or understand the remote collection. Callers fall
/// back to the local cache on every variant.
#[derive(Debug, Error)]
pub enum RemoteUnavailable {
    #[error("remote record service is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("remote responded with {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Resolved target for one request.
struct Endpoint {
    url: String,
    key: String,
    timeout: Option<Duration>,
}

/// Thin client over the remote `message` collection: list and create.
///
/// Configuration is read on every call, so `reconfigure` takes effect for the
/// next request without rebuilding the client.
pub struct RemoteRecordService {
    client: Client,
    config: RwLock<RemoteConfig>,
}

impl RemoteRecordService {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config: RwLock::new(config),
        }
    }

    pub fn config(&self) -> RemoteConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swap in new settings at runtime.
    pub fn reconfigure(&self, config: RemoteConfig) {
        let configured = config.is_configured();
        match self.config.write() {
            Ok(mut current) => *current = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
        debug!("Remote reconfigured (configured: {})", configured);
    }

    pub fn is_configured(&self) -> bool {
        self.config().is_configured()
    }

    /// All records, newest first, sorted server-side.
    pub async fn list(&self) -> Result<Vec<Record>, RemoteUnavailable> {
        let endpoint = self.endpoint()?;

        let resp = authed(self.client.get(&endpoint.url), &endpoint)
            .query(&[("select", "*"), ("order", "timestamp.desc")])
            .send()
            .await
            .map_err(RemoteUnavailable::Transport)?;

        if !resp.status().is_success() {
            return Err(RemoteUnavailable::Status(resp.status()));
        }

        let body = resp.bytes().await.map_err(RemoteUnavailable::Transport)?;
        let records: Vec<Record> =
            serde_json::from_slice(&body).map_err(RemoteUnavailable::Malformed)?;

        debug!("Fetched {} records from remote", records.len());
        Ok(records)
    }

    /// Write one record. Every failure is logged and reported as `false`.
    pub async fn create(&self, record: &Record) -> bool {
        match self.try_create(record).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Remote write of {} failed: {}", record.id, e);
                false
            }
        }
    }

    async fn try_create(&self, record: &Record) -> Result<(), RemoteUnavailable> {
        let endpoint = self.endpoint()?;

        let resp = authed(self.client.post(&endpoint.url), &endpoint)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(RemoteUnavailable::Transport)?;

        if !resp.status().is_success() {
            return Err(RemoteUnavailable::Status(resp.status()));
        }

        debug!("Remote accepted record {}", record.id);
        Ok(())
    }

    fn endpoint(&self) -> Result<Endpoint, RemoteUnavailable> {
        let config = self.config();
        match (config.collection_url(COLLECTION), config.api_key()) {
            (Some(url), Some(key)) if config.is_configured() => Ok(Endpoint {
                url,
                key: key.to_string(),
                timeout: config.request_timeout,
            }),
            _ => Err(RemoteUnavailable::NotConfigured),
        }
    }
}

fn authed(req: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
    let req = req
        .header("apikey", &endpoint.key)
        .header(AUTHORIZATION, format!("Bearer {}", endpoint.key));

    match endpoint.timeout {
        Some(timeout) => req.timeout(timeout),
        None => req,
    }
}
