//! Core configuration types.
//!
//! [`Config`] carries every tunable the core needs. It is passed in
//! explicitly at bootstrap; nothing in the crate reads process-wide settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Conan core.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    // Remote player
    /// Base URL of the Beefweb REST API, without a trailing slash.
    pub api_url: String,

    /// Per-request timeout for calls to the remote player (milliseconds).
    pub request_timeout_ms: u64,

    // Sync
    /// Period between sync ticks (milliseconds).
    pub poll_interval_ms: u64,

    // Server
    /// Port for the local HTTP/WS server.
    pub bind_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8880/api".to_string(),
            request_timeout_ms: 2000,
            poll_interval_ms: 250,
            bind_port: 31311,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be >= 1".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be >= 1".to_string());
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }
        Ok(())
    }

    /// Returns the API base URL with any trailing slashes removed.
    #[must_use]
    pub fn normalized_api_url(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_port, 31311);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = Config {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_api_url_is_rejected() {
        let config = Config {
            api_url: "ftp://player/api".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = Config {
            api_url: "http://10.0.0.2:8880/api//".to_string(),
            ..Default::default()
        };
        assert_eq!(config.normalized_api_url(), "http://10.0.0.2:8880/api");
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"bind_port": 9000}"#).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.poll_interval_ms, 250);
    }
}
