//! Client runtime configuration.
//!
//! Read from `NOTMOBIL_*` environment variables; every value has a default so
//! a bare environment points at a local development API.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::util::normalize_base_url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 15 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the note API, without trailing slash
    pub api_url: String,
    /// Bound applied to every remote call
    pub http_timeout: Duration,
    /// Period of the background sync loop
    pub sync_interval: Duration,
    /// Explicit database location; hosts pick a default when unset
    pub db_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            db_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = value_or_default(&lookup, "NOTMOBIL_API_URL", DEFAULT_API_URL);
        let api_url = normalize_base_url(&raw_url).ok_or_else(|| {
            ConfigError::Invalid("NOTMOBIL_API_URL must start with http:// or https://".to_string())
        })?;

        let http_timeout_secs = parse_secs(
            &lookup,
            "NOTMOBIL_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
            1..=300,
        )?;
        let sync_interval_secs = parse_secs(
            &lookup,
            "NOTMOBIL_SYNC_INTERVAL_SECS",
            DEFAULT_SYNC_INTERVAL_SECS,
            5..=86_400,
        )?;

        let db_path = optional_trimmed(&lookup, "NOTMOBIL_DB_PATH").map(PathBuf::from);

        Ok(Self {
            api_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            sync_interval: Duration::from_secs(sync_interval_secs),
            db_path,
        })
    }
}

fn parse_secs(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    range: std::ops::RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    let Some(raw) = optional_trimmed(lookup, name) else {
        return Ok(default);
    };
    let value = raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "{name} must be an integer in [{}, {}]",
            range.start(),
            range.end()
        ))
    })?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must be in [{}, {}]",
            range.start(),
            range.end()
        )));
    }
    Ok(value)
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
