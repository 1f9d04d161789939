//! Static client configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use reqwest::Url;

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_RECONNECT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// REST API base.
    pub backend_url: Url,
    /// WebSocket endpoint of the room service.
    pub socket_url: Url,
    /// Origin used to build shareable join links.
    pub origin: Url,
    /// Explicit bearer token, takes precedence over `token_file`.
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub reconnect_delay: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads `LIVEPOLL_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !matches!(e, dotenvy::Error::Io(_)) {
                warn!("Failed to load .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let backend_url = parse_url(
            "LIVEPOLL_BACKEND_URL",
            var("LIVEPOLL_BACKEND_URL").as_deref().unwrap_or(DEFAULT_BACKEND_URL),
        )?;

        let socket_url = match var("LIVEPOLL_SOCKET_URL") {
            Some(raw) => parse_url("LIVEPOLL_SOCKET_URL", &raw)?,
            None => parse_url(
                "LIVEPOLL_BACKEND_URL",
                &backend_url.as_str().replacen("http", "ws", 1),
            )?,
        };

        let origin = parse_url(
            "LIVEPOLL_ORIGIN",
            var("LIVEPOLL_ORIGIN").as_deref().unwrap_or(DEFAULT_ORIGIN),
        )?;

        let reconnect_delay = match var("LIVEPOLL_RECONNECT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::InvalidSeconds {
                    key: "LIVEPOLL_RECONNECT_SECS",
                    value: raw.clone(),
                }
            })?),
            None => Duration::from_secs(DEFAULT_RECONNECT_SECS),
        };

        let config = Self {
            backend_url,
            socket_url,
            origin,
            token: var("LIVEPOLL_TOKEN"),
            token_file: var("LIVEPOLL_TOKEN_FILE").map(PathBuf::from),
            reconnect_delay,
        };
        info!(
            "Backend {} / socket {} / origin {}",
            config.backend_url, config.socket_url, config.origin
        );
        Ok(config)
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.socket_url.as_str(), "ws://localhost:5000/");
        assert_eq!(config.origin.as_str(), "http://localhost:3000/");
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert!(config.token.is_none());
    }

    #[test]
    fn socket_url_follows_https_backend() {
        let config =
            Config::from_lookup(lookup(&[("LIVEPOLL_BACKEND_URL", "https://api.example.com")]))
                .unwrap();
        assert_eq!(config.socket_url.scheme(), "wss");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("LIVEPOLL_TOKEN", "   ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("LIVEPOLL_ORIGIN", "not a url")])),
            Err(ConfigError::InvalidUrl { key: "LIVEPOLL_ORIGIN", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("LIVEPOLL_RECONNECT_SECS", "soon")])),
            Err(ConfigError::InvalidSeconds { .. })
        ));
    }
}
