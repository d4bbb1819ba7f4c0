use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use pulse_remote::RemoteConfig;

/// Default re-fetch period for the feed.
const DEFAULT_REFRESH_SECS: u64 = 15;

/// Everything the server reads from its environment, gathered once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub refresh_interval: Duration,
    pub remote: RemoteConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| setting(&lookup, name);

        let host = get("PULSE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("PULSE_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .context("PULSE_PORT is not a valid port")?;
        let db_path: PathBuf = get("PULSE_DB_PATH")
            .unwrap_or_else(|| "pulse.db".into())
            .into();

        let refresh_secs: u64 = match get("PULSE_REFRESH_SECS") {
            Some(v) => v.parse::<u64>().context("PULSE_REFRESH_SECS is not a number")?,
            None => DEFAULT_REFRESH_SECS,
        };

        let request_timeout = get("PULSE_REMOTE_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>().context("PULSE_REMOTE_TIMEOUT_SECS is not a number"))
            .transpose()?
            .map(Duration::from_secs);

        let base_url = get("PULSE_REST_URL").or_else(|| {
            get("SUPABASE_URL").map(|url| format!("{}/rest/v1", url.trim_end_matches('/')))
        });
        let api_key = get("PULSE_API_KEY").or_else(|| get("SUPABASE_KEY"));

        Ok(Self {
            host,
            port,
            db_path,
            refresh_interval: Duration::from_secs(refresh_secs.max(1)),
            remote: RemoteConfig {
                base_url,
                api_key,
                request_timeout,
            },
        })
    }
}

/// `VITE_`-prefixed name first, then the plain one. Blank values count as unset.
fn setting(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    [format!("VITE_{}", name), name.to_string()]
        .iter()
        .filter_map(|key| lookup(key.as_str()))
        .find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let c = config(&[]).unwrap();
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 3000);
        assert_eq!(c.db_path, PathBuf::from("pulse.db"));
        assert_eq!(c.refresh_interval, Duration::from_secs(15));
        assert!(!c.remote.is_configured());
        assert_eq!(c.remote.request_timeout, None);
    }

    #[test]
    fn supabase_url_gets_rest_prefix() {
        let c = config(&[
            ("SUPABASE_URL", "https://proj.supabase.co/"),
            ("SUPABASE_KEY", "anon-key-123"),
        ])
        .unwrap();
        assert_eq!(c.remote.base_url.as_deref(), Some("https://proj.supabase.co/rest/v1"));
        assert!(c.remote.is_configured());
    }

    #[test]
    fn explicit_rest_url_wins() {
        let c = config(&[
            ("PULSE_REST_URL", "http://localhost:54321/api"),
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("PULSE_API_KEY", "pulse-key-1"),
            ("SUPABASE_KEY", "other-key-2"),
        ])
        .unwrap();
        assert_eq!(c.remote.base_url.as_deref(), Some("http://localhost:54321/api"));
        assert_eq!(c.remote.api_key.as_deref(), Some("pulse-key-1"));
    }

    #[test]
    fn vite_prefix_is_checked_first() {
        let c = config(&[
            ("VITE_SUPABASE_KEY", "vite-key-1"),
            ("SUPABASE_KEY", "plain-key-2"),
        ])
        .unwrap();
        assert_eq!(c.remote.api_key.as_deref(), Some("vite-key-1"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let c = config(&[("VITE_PULSE_PORT", "  "), ("PULSE_PORT", "8080")]).unwrap();
        assert_eq!(c.port, 8080);
    }

    #[test]
    fn timeout_and_refresh_parse() {
        let c = config(&[
            ("PULSE_REMOTE_TIMEOUT_SECS", "10"),
            ("PULSE_REFRESH_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(c.remote.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(c.refresh_interval, Duration::from_secs(1));
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(config(&[("PULSE_PORT", "http")]).is_err());
        assert!(config(&[("PULSE_REFRESH_SECS", "soon")]).is_err());
        assert!(config(&[("PULSE_REMOTE_TIMEOUT_SECS", "-1")]).is_err());
    }
}
