//! The rate-limited, cached GET path every GitHub read goes through.
//!
//! ## Algorithm
//!
//! 1. Cache lookup. A fresh hit returns without touching the network or the
//!    rate-limit state.
//! 2. Up to `max_attempts` attempts, each preceded by a budget reservation:
//!    - 200: cache (when the class allows it) and return the body
//!    - 404: `NotFound`, no retry
//!    - 403/429: wait for the advertised reset, `retry-after`, or an
//!      exponential backoff; a wait over `max_throttle_wait` is fatal
//!    - 5xx and transport errors: exponential backoff
//!    - anything else: `Failed` immediately
//! 3. Every response refreshes the bucket from its headers.
//!
//! Only [`RateLimitError`] is returned as an error. Everything else resolves
//! to a [`Fetched`] value so callers can degrade to empty results.

use crate::cache::{CacheClass, ResponseCache, cache_key};
use crate::error::{RateLimitError, TransportError};
use crate::rate_limit::{Bucket, Gate, RateLimiter};
use crate::transport::{HttpResponse, Transport};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Retry waits above this abort the run.
pub const DEFAULT_MAX_THROTTLE_WAIT: Duration = Duration::from_secs(120);

const MAX_REASON_CHARS: usize = 200;

/// Outcome of a GET that did not hit a rate-limit wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Body(String),
    NotFound,
    Failed {
        status: Option<u16>,
        reason: String,
    },
}

impl Fetched {
    pub fn is_body(&self) -> bool {
        matches!(self, Fetched::Body(_))
    }
}

pub struct RateLimitedClient {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache>,
    base_url: String,
    max_attempts: u32,
    max_throttle_wait: Duration,
}

impl RateLimitedClient {
    /// Create a client with fresh rate-limit and cache state.
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self::with_resources(
            transport,
            base_url,
            Arc::new(RateLimiter::new()),
            Arc::new(ResponseCache::new()),
        )
    }

    /// Create a client around existing shared state.
    pub fn with_resources(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        limiter: Arc<RateLimiter>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            limiter,
            cache,
            base_url,
            max_attempts: 3,
            max_throttle_wait: DEFAULT_MAX_THROTTLE_WAIT,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_max_throttle_wait(mut self, wait: Duration) -> Self {
        self.max_throttle_wait = wait;
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, params), fields(bucket = %bucket))]
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        bucket: Bucket,
        class: CacheClass,
    ) -> Result<Fetched, RateLimitError> {
        let key = cache_key(endpoint, params);
        if let Some(body) = self.cache.get(key, class) {
            debug!("Cache hit");
            return Ok(Fetched::Body(body));
        }

        let url = format!("{}{}", self.base_url, endpoint);
        let mut last_failure = Fetched::Failed {
            status: None,
            reason: "no attempt made".to_string(),
        };

        for attempt in 0..self.max_attempts {
            self.wait_for_budget(bucket).await?;
            let is_last = attempt + 1 == self.max_attempts;

            let response = match self.transport.get(&url, params).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(attempt, error = %err, "Transport error");
                    last_failure = transport_failure(&err);
                    if !is_last {
                        tokio::time::sleep(backoff(attempt)).await;
                    }
                    continue;
                }
            };

            self.limiter.record_response(bucket, &response);

            match response.status {
                200 => {
                    if class.ttl().is_some() {
                        self.cache.insert(key, response.body.clone());
                    }
                    return Ok(Fetched::Body(response.body));
                }
                404 => return Ok(Fetched::NotFound),
                403 | 429 => {
                    let Some(wait) = throttle_wait(&response, attempt, Utc::now()) else {
                        return Ok(failure(&response));
                    };
                    if wait > self.max_throttle_wait {
                        let reset_at = Utc::now()
                            + chrono::Duration::from_std(wait)
                                .unwrap_or_else(|_| chrono::Duration::seconds(0));
                        warn!(wait_secs = wait.as_secs(), "Throttled beyond acceptable wait");
                        return Err(RateLimitError { bucket, reset_at });
                    }
                    warn!(attempt, wait_secs = wait.as_secs(), status = response.status, "Throttled");
                    last_failure = failure(&response);
                    if !is_last {
                        tokio::time::sleep(wait).await;
                    }
                }
                status if status >= 500 => {
                    warn!(attempt, status, "Server error");
                    last_failure = failure(&response);
                    if !is_last {
                        tokio::time::sleep(backoff(attempt)).await;
                    }
                }
                status => {
                    debug!(status, "Non-retryable status");
                    return Ok(failure(&response));
                }
            }
        }

        Ok(last_failure)
    }

    /// Single GET with no gate, cache or retry. Used for status queries that
    /// GitHub does not meter.
    pub async fn get_unmetered(&self, endpoint: &str) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.transport.get(&url, &[]).await
    }

    async fn wait_for_budget(&self, bucket: Bucket) -> Result<(), RateLimitError> {
        match self.limiter.reserve(bucket, Utc::now()) {
            Gate::Proceed => Ok(()),
            Gate::Wait(wait) => {
                info!(%bucket, wait_secs = wait.as_secs(), "Rate limit low, waiting for reset");
                tokio::time::sleep(wait).await;
                Ok(())
            }
            Gate::Exhausted(err) => {
                warn!(%bucket, reset_at = %err.reset_at, "Rate limit exhausted");
                Err(err)
            }
        }
    }
}

/// `2^attempt` seconds.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// How long to wait after a 403/429, or `None` when the 403 is a plain
/// permission error rather than throttling.
fn throttle_wait(response: &HttpResponse, attempt: u32, now: DateTime<Utc>) -> Option<Duration> {
    let remaining = response.header_i64("x-ratelimit-remaining");
    let retry_after = response.header_i64("retry-after");

    // GitHub signals secondary rate limits with `retry-after` and primary
    // ones with `x-ratelimit-remaining: 0`. A 403 with budget left and
    // neither hint is an access error, and retrying it cannot succeed.
    if response.status == 403 && retry_after.is_none() && remaining.is_some_and(|r| r > 0) {
        return None;
    }

    // A reset header only describes this throttle when the primary budget is
    // actually spent; secondary limits keep budget and send retry-after.
    if remaining.is_none_or(|r| r <= 0) {
        if let Some(reset) = response.header_i64("x-ratelimit-reset") {
            let secs = (reset - now.timestamp()).max(0) as u64;
            return Some(Duration::from_secs(secs));
        }
    }

    if let Some(secs) = retry_after {
        return Some(Duration::from_secs(secs.max(0) as u64));
    }

    Some(backoff(attempt))
}

fn failure(response: &HttpResponse) -> Fetched {
    Fetched::Failed {
        status: Some(response.status),
        reason: response.body.chars().take(MAX_REASON_CHARS).collect(),
    }
}

fn transport_failure(err: &TransportError) -> Fetched {
    Fetched::Failed {
        status: None,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::RateLimitState;
    use crate::testing::FakeTransport;
    use tokio::time::Instant;

    fn client(transport: &Arc<FakeTransport>) -> RateLimitedClient {
        RateLimitedClient::new(transport.clone(), "http://github.test")
    }

    fn no_params() -> Vec<(String, String)> {
        Vec::new()
    }

    // ========================================================================
    // Budget gate
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_low_budget_sleeps_until_reset() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/search/users", HttpResponse::new(200, "{}"));
        let client = client(&transport);
        client.limiter().set_state(
            Bucket::Search,
            RateLimitState {
                remaining: 1,
                reset_epoch: Utc::now().timestamp() + 30,
            },
        );

        let start = Instant::now();
        let result = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Uncached)
            .await
            .unwrap();

        assert!(result.is_body());
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert_eq!(transport.calls("/search/users"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distant_reset_raises_without_request() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/search/users", HttpResponse::new(200, "{}"));
        let client = client(&transport);
        let reset = Utc::now().timestamp() + 200;
        client.limiter().set_state(
            Bucket::Search,
            RateLimitState {
                remaining: 1,
                reset_epoch: reset,
            },
        );

        let err = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Uncached)
            .await
            .unwrap_err();

        assert_eq!(err.bucket, Bucket::Search);
        assert_eq!(err.reset_at.timestamp(), reset);
        assert_eq!(transport.calls("/search/users"), 0);
    }

    // ========================================================================
    // Cache
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_network_and_budget() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/users/octocat", HttpResponse::new(200, r#"{"login":"octocat"}"#));
        let client = client(&transport);

        let first = client
            .get("/users/octocat", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();
        let remaining_after_first = client.limiter().state(Bucket::General).remaining;

        tokio::time::advance(Duration::from_secs(599)).await;
        let second = client
            .get("/users/octocat", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls("/users/octocat"), 1);
        assert_eq!(
            client.limiter().state(Bucket::General).remaining,
            remaining_after_first
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/users/octocat", HttpResponse::new(200, r#"{"login":"octocat"}"#));
        let client = client(&transport);

        client
            .get("/users/octocat", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(601)).await;
        client
            .get("/users/octocat", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();

        assert_eq!(transport.calls("/users/octocat"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/users/ghost", HttpResponse::new(404, "Not Found"));
        let client = client(&transport);

        for _ in 0..2 {
            let result = client
                .get("/users/ghost", &no_params(), Bucket::General, CacheClass::Profile)
                .await
                .unwrap();
            assert_eq!(result, Fetched::NotFound);
        }
        assert_eq!(transport.calls("/users/ghost"), 2);
        assert!(client.cache().is_empty());
    }

    // ========================================================================
    // Retries
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_retried() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/users/flaky", HttpResponse::new(502, "bad gateway"));
        transport.respond("/users/flaky", HttpResponse::new(200, r#"{"login":"flaky"}"#));
        let client = client(&transport);

        let start = Instant::now();
        let result = client
            .get("/users/flaky", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();

        assert!(result.is_body());
        assert_eq!(transport.calls("/users/flaky"), 2);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_exhausted_is_failed() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail("/users/down", TransportError::Timeout);
        let client = client(&transport);

        let result = client
            .get("/users/down", &no_params(), Bucket::General, CacheClass::Profile)
            .await
            .unwrap();

        assert!(matches!(result, Fetched::Failed { status: None, .. }));
        assert_eq!(transport.calls("/users/down"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/search/users", HttpResponse::new(422, "Validation Failed"));
        let client = client(&transport);

        let result = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Search)
            .await
            .unwrap();

        assert_eq!(
            result,
            Fetched::Failed {
                status: Some(422),
                reason: "Validation Failed".to_string()
            }
        );
        assert_eq!(transport.calls("/search/users"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_with_short_retry_after_retries() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/search/users",
            HttpResponse::new(429, "slow down").with_header("retry-after", 5),
        );
        transport.respond("/search/users", HttpResponse::new(200, "{}"));
        let client = client(&transport);

        let start = Instant::now();
        let result = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Search)
            .await
            .unwrap();

        assert!(result.is_body());
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_with_distant_reset_is_fatal() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/search/users",
            HttpResponse::new(403, "rate limited")
                .with_header("x-ratelimit-remaining", 0)
                .with_header("x-ratelimit-reset", Utc::now().timestamp() + 600),
        );
        let client = client(&transport);

        let err = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Search)
            .await
            .unwrap_err();

        assert_eq!(err.bucket, Bucket::Search);
        assert_eq!(transport.calls("/search/users"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_secondary_limit_follows_retry_after() {
        let transport = Arc::new(FakeTransport::new());
        // Budget left and a distant primary reset: only retry-after applies.
        transport.respond(
            "/search/users",
            HttpResponse::new(403, "secondary rate limit")
                .with_header("x-ratelimit-remaining", 20)
                .with_header("x-ratelimit-reset", Utc::now().timestamp() + 3000)
                .with_header("retry-after", 3),
        );
        transport.respond("/search/users", HttpResponse::new(200, "{}"));
        let client = client(&transport);

        let start = Instant::now();
        let result = client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Search)
            .await
            .unwrap();

        assert!(result.is_body());
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(60));
        assert_eq!(transport.calls("/search/users"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forbidden_with_budget_is_plain_failure() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/repos/acme/private/commits",
            HttpResponse::new(403, "Resource not accessible")
                .with_header("x-ratelimit-remaining", 4000)
                .with_header("x-ratelimit-reset", Utc::now().timestamp() + 3000),
        );
        let client = client(&transport);

        let result = client
            .get(
                "/repos/acme/private/commits",
                &no_params(),
                Bucket::General,
                CacheClass::Repository,
            )
            .await
            .unwrap();

        assert!(matches!(result, Fetched::Failed { status: Some(403), .. }));
        assert_eq!(transport.calls("/repos/acme/private/commits"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_headers_update_bucket() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/search/users",
            HttpResponse::new(200, "{}")
                .with_header("x-ratelimit-remaining", 17)
                .with_header("x-ratelimit-reset", 1_900_000_000),
        );
        let client = client(&transport);

        client
            .get("/search/users", &no_params(), Bucket::Search, CacheClass::Search)
            .await
            .unwrap();

        let state = client.limiter().state(Bucket::Search);
        assert_eq!(state.remaining, 17);
        assert_eq!(state.reset_epoch, 1_900_000_000);
    }
}
