//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind the HTTP server to.
    /// Override: `CONAN_BIND_PORT`
    pub bind_port: u16,

    /// Beefweb API base URL of the foobar2000 instance.
    /// Override: `FOOBAR_API_URL`
    pub api_url: String,

    /// Milliseconds between player polls.
    /// Override: `CONAN_POLL_INTERVAL_MS`
    pub poll_interval_ms: u64,

    /// Per-request timeout for Beefweb calls, in milliseconds.
    /// Override: `CONAN_REQUEST_TIMEOUT_MS`
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let core = conan_core::Config::default();
        Self {
            bind_port: core.bind_port,
            api_url: core.api_url,
            poll_interval_ms: core.poll_interval_ms,
            request_timeout_ms: core.request_timeout_ms,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Values that fail to parse are ignored with a warning.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("CONAN_BIND_PORT") {
            match val.parse() {
                Ok(port) => self.bind_port = port,
                Err(_) => log::warn!("Ignoring invalid CONAN_BIND_PORT: {}", val),
            }
        }

        if let Some(val) = lookup("FOOBAR_API_URL") {
            if !val.trim().is_empty() {
                self.api_url = val.trim().to_string();
            }
        }

        if let Some(val) = lookup("CONAN_POLL_INTERVAL_MS") {
            match val.parse() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(_) => log::warn!("Ignoring invalid CONAN_POLL_INTERVAL_MS: {}", val),
            }
        }

        if let Some(val) = lookup("CONAN_REQUEST_TIMEOUT_MS") {
            match val.parse() {
                Ok(ms) => self.request_timeout_ms = ms,
                Err(_) => log::warn!("Ignoring invalid CONAN_REQUEST_TIMEOUT_MS: {}", val),
            }
        }
    }

    /// Converts to conan-core's Config type.
    pub fn to_core_config(&self) -> conan_core::Config {
        conan_core::Config {
            api_url: self.api_url.trim_end_matches('/').to_string(),
            request_timeout_ms: self.request_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
            bind_port: self.bind_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_core() {
        let config = ServerConfig::default().to_core_config();
        assert_eq!(config.api_url, "http://127.0.0.1:8880/api");
        assert_eq!(config.bind_port, 31311);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.request_timeout_ms, 2000);
    }

    #[test]
    fn loads_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_port: 8080\napi_url: http://music.local:8880/api/").unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(
            config.to_core_config().api_url,
            "http://music.local:8880/api"
        );
    }

    #[test]
    fn rejects_unparseable_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_port: [not, a, port]").unwrap();

        assert!(ServerConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(ServerConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = ServerConfig {
            bind_port: 8080,
            ..ServerConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("CONAN_BIND_PORT", "9000"),
            ("FOOBAR_API_URL", "http://10.0.0.5:8880/api"),
            ("CONAN_POLL_INTERVAL_MS", "500"),
            ("CONAN_REQUEST_TIMEOUT_MS", "750"),
        ]));

        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.api_url, "http://10.0.0.5:8880/api");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.request_timeout_ms, 750);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = ServerConfig::default();
        config.apply_env_overrides(env(&[
            ("CONAN_BIND_PORT", "seventy"),
            ("FOOBAR_API_URL", "  "),
            ("CONAN_POLL_INTERVAL_MS", "-1"),
        ]));

        assert_eq!(config.bind_port, 31311);
        assert_eq!(config.api_url, "http://127.0.0.1:8880/api");
        assert_eq!(config.poll_interval_ms, 250);
    }
}
