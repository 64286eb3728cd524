use crate::rate_limit::Bucket;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A rate-limit budget is exhausted and waiting it out is not acceptable.
///
/// This is the only error the read paths propagate. It carries the reset
/// instant so the caller can schedule a retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{bucket} rate limit exhausted until {reset_at}")]
pub struct RateLimitError {
    pub bucket: Bucket,
    pub reset_at: DateTime<Utc>,
}

/// A search request that produced no usable page.
///
/// Unlike the other reads, a failed search is not the same as "no hits":
/// the caller reports it as a failed strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error("{what} failed: {reason}")]
    Failed { what: &'static str, reason: String },
}

/// Errors from the raw HTTP transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Errors that can occur when building or querying the client outside the
/// regular read paths.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for GitHubError {
    fn from(err: serde_json::Error) -> Self {
        GitHubError::Decode(err.to_string())
    }
}
