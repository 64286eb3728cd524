//! Run configuration loaded from the environment.
//!
//! A `.env` file in the working directory is read first (if present); real
//! environment variables take precedence over it.
//!
//! | Variable | Default |
//! |---|---|
//! | `GITHUB_TOKEN` | unset (unauthenticated limits) |
//! | `GITHUB_API_URL` | `https://api.github.com` |
//! | `MAX_CANDIDATES_PER_JOB` | 10 |
//! | `SEARCH_BATCH_SIZE` | 3 |
//! | `BATCH_DELAY_MS` | 1000 |
//! | `HTTP_TIMEOUT_SECS` | 30 |
//! | `LLM_SERVICE_URL` | unset (local fallbacks) |
//! | `CHECK_RECENT_ACTIVITY` | true |

use github_client::{DEFAULT_API_URL, GitHubConfig};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub max_candidates_per_job: usize,
    pub search_batch_size: usize,
    pub batch_delay: Duration,
    pub http_timeout: Duration,
    pub llm_service_url: Option<String>,
    pub check_recent_activity: bool,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_API_URL.to_string(),
            max_candidates_per_job: 10,
            search_batch_size: 3,
            batch_delay: Duration::from_millis(1000),
            http_timeout: Duration::from_secs(30),
            llm_service_url: None,
            check_recent_activity: true,
        }
    }
}

impl ScoutConfig {
    /// Load from the process environment, after reading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => debug!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_candidates_per_job =
            parse_positive(&get, "MAX_CANDIDATES_PER_JOB", defaults.max_candidates_per_job)?;
        let search_batch_size =
            parse_positive(&get, "SEARCH_BATCH_SIZE", defaults.search_batch_size)?;
        let batch_delay_ms = parse(&get, "BATCH_DELAY_MS", 1000u64)?;
        let http_timeout_secs = parse_positive(&get, "HTTP_TIMEOUT_SECS", 30u64)?;
        let check_recent_activity = match get("CHECK_RECENT_ACTIVITY") {
            None => defaults.check_recent_activity,
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: "CHECK_RECENT_ACTIVITY".to_string(),
                value,
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(Self {
            github_token: get("GITHUB_TOKEN"),
            github_api_url: get("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.github_api_url),
            max_candidates_per_job,
            search_batch_size,
            batch_delay: Duration::from_millis(batch_delay_ms),
            http_timeout: Duration::from_secs(http_timeout_secs),
            llm_service_url: get("LLM_SERVICE_URL"),
            check_recent_activity,
        })
    }

    pub fn github_config(&self) -> GitHubConfig {
        GitHubConfig {
            token: self.github_token.clone(),
            api_url: self.github_api_url.clone(),
            timeout: self.http_timeout,
        }
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_positive<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default + std::fmt::Display,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    let value = parse(get, key, default)?;
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
