//! Per-bucket rate-limit bookkeeping.
//!
//! GitHub meters the search API separately from everything else, so the
//! limiter tracks two buckets. State starts optimistic and is corrected by
//! the `x-ratelimit-*` headers of every response.
//!
//! ## Algorithm
//!
//! [`RateLimiter::reserve`] checks and decrements the budget under one lock:
//!
//! 1. `remaining > 1` or the reset instant has passed → take one unit, proceed
//! 2. reset is at most `max_wait` away → caller sleeps until reset
//! 3. otherwise → [`RateLimitError`] with the reset instant
//!
//! Doing both under the same lock means a batch of concurrent requests can
//! never spend more than the budget they collectively observed.

use crate::error::RateLimitError;
use crate::transport::HttpResponse;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Longest wait the gate will sleep through before giving up.
pub const DEFAULT_MAX_GATE_WAIT: Duration = Duration::from_secs(60);

/// Extra second on top of the reset difference. Reset epochs have one
/// second resolution.
const RESET_SLACK: Duration = Duration::from_secs(1);

/// Independently metered request budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    General,
    Search,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::General => "general",
            Bucket::Search => "search",
        }
    }

    /// Authenticated per-window budget, used as the optimistic starting point.
    pub fn initial_state(&self) -> RateLimitState {
        let remaining = match self {
            Bucket::General => 5000,
            Bucket::Search => 30,
        };
        RateLimitState {
            remaining,
            reset_epoch: 0,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remaining calls and the epoch second at which the budget refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub reset_epoch: i64,
}

impl RateLimitState {
    pub fn reset_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.reset_epoch, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Decision of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    Wait(Duration),
    Exhausted(RateLimitError),
}

/// Shared rate-limit state for both buckets.
pub struct RateLimiter {
    states: Mutex<HashMap<Bucket, RateLimitState>>,
    max_wait: Duration,
}

impl RateLimiter {
    pub fn new() -> Self {
        let states = [Bucket::General, Bucket::Search]
            .into_iter()
            .map(|b| (b, b.initial_state()))
            .collect();

        Self {
            states: Mutex::new(states),
            max_wait: DEFAULT_MAX_GATE_WAIT,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn state(&self, bucket: Bucket) -> RateLimitState {
        self.states
            .lock()
            .get(&bucket)
            .copied()
            .unwrap_or_else(|| bucket.initial_state())
    }

    /// Overwrite a bucket, e.g. from an explicit status query.
    pub fn set_state(&self, bucket: Bucket, state: RateLimitState) {
        self.states.lock().insert(bucket, state);
    }

    /// Check the budget and take one unit of it in a single step.
    pub fn reserve(&self, bucket: Bucket, now: DateTime<Utc>) -> Gate {
        let mut states = self.states.lock();
        let state = states
            .entry(bucket)
            .or_insert_with(|| bucket.initial_state());

        let now_secs = now.timestamp();
        if state.remaining <= 1 && state.reset_epoch > now_secs {
            let until_reset = (state.reset_epoch - now_secs) as u64;
            if until_reset > self.max_wait.as_secs() {
                return Gate::Exhausted(RateLimitError {
                    bucket,
                    reset_at: state.reset_at(),
                });
            }
            // Leave the state alone: every concurrent caller waits for the
            // same reset instead of spending the last unit.
            return Gate::Wait(Duration::from_secs(until_reset) + RESET_SLACK);
        }

        state.remaining = state.remaining.saturating_sub(1);
        Gate::Proceed
    }

    /// Refresh a bucket from `x-ratelimit-remaining` / `x-ratelimit-reset`.
    ///
    /// Responses without both headers leave the state untouched.
    pub fn record_response(&self, bucket: Bucket, response: &HttpResponse) {
        let remaining = response.header_i64("x-ratelimit-remaining");
        let reset = response.header_i64("x-ratelimit-reset");

        if let (Some(remaining), Some(reset_epoch)) = (remaining, reset) {
            let state = RateLimitState {
                remaining: remaining.clamp(0, u32::MAX as i64) as u32,
                reset_epoch,
            };
            debug!(%bucket, remaining = state.remaining, reset_epoch, "Rate limit updated");
            self.set_state(bucket, state);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
