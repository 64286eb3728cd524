//! # GitHub Client
//!
//! Typed access to the handful of GitHub REST endpoints the sourcing engine
//! reads, built on a rate-limited, cached GET path.
//!
//! ## Main Components
//!
//! - **client**: [`RateLimitedClient`], the retrying GET with budget gate and cache
//! - **rate_limit**: per-bucket budget state with an atomic reserve step
//! - **cache**: TTL response cache keyed by endpoint and sorted params
//! - **transport**: the HTTP seam and its `reqwest` implementation
//!
//! Non-critical reads degrade to empty results with a warning and only
//! propagate [`RateLimitError`], because it means the whole run has to stop
//! until the reset instant. Searches also report their own failure as
//! [`SearchError::Failed`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use github_client::{GitHubClient, GitHubConfig};
//!
//! let client = GitHubClient::new(GitHubConfig::default())?;
//! let hits = client.search_users("rust in:bio type:user", 1, 15).await?;
//! for hit in hits {
//!     if let Some(profile) = client.get_user(&hit.login).await? {
//!         println!("{} has {} repos", profile.login, profile.public_repos);
//!     }
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod rate_limit;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use cache::{CacheClass, ResponseCache};
pub use client::{Fetched, RateLimitedClient};
pub use error::{GitHubError, RateLimitError, SearchError, TransportError};
pub use rate_limit::{Bucket, RateLimitState, RateLimiter};
pub use transport::{HttpResponse, ReqwestTransport, Transport};

use scout_model::{CommitSummary, Contributor, RawProfile, RepoSummary, UserHit};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for [`GitHubClient::new`].
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Ordering for a user's repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    Pushed,
    Updated,
}

impl RepoSort {
    fn as_str(&self) -> &'static str {
        match self {
            RepoSort::Pushed => "pushed",
            RepoSort::Updated => "updated",
        }
    }
}

/// Budget of both buckets as reported by `GET /rate_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub general: RateLimitState,
    pub search: RateLimitState,
}

#[derive(Deserialize)]
struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct RateLimitBody {
    resources: RateLimitResources,
}

#[derive(Deserialize)]
struct RateLimitResources {
    core: RateLimitResource,
    search: RateLimitResource,
}

#[derive(Deserialize)]
struct RateLimitResource {
    remaining: u32,
    reset: i64,
}

impl From<RateLimitResource> for RateLimitState {
    fn from(r: RateLimitResource) -> Self {
        RateLimitState {
            remaining: r.remaining,
            reset_epoch: r.reset,
        }
    }
}

/// Cheaply cloneable handle over a shared [`RateLimitedClient`].
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<RateLimitedClient>,
}

impl GitHubClient {
    /// Connect to the GitHub API over HTTPS.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        if config.token.as_deref().is_none_or(|t| t.trim().is_empty()) {
            warn!("No GitHub token configured, using unauthenticated rate limits");
        }
        let transport = ReqwestTransport::new(config.token.as_deref(), config.timeout)?;
        info!(api_url = %config.api_url, "GitHub client ready");
        Ok(Self::from_client(RateLimitedClient::new(
            Arc::new(transport),
            config.api_url,
        )))
    }

    pub fn from_client(client: RateLimitedClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn with_transport(transport: Arc<dyn Transport>, api_url: impl Into<String>) -> Self {
        Self::from_client(RateLimitedClient::new(transport, api_url))
    }

    pub fn raw(&self) -> &RateLimitedClient {
        &self.inner
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        self.inner.limiter()
    }

    /// `GET /search/users`. One page of hits.
    pub async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<UserHit>, SearchError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        let fetched = self
            .inner
            .get("/search/users", &params, Bucket::Search, CacheClass::Search)
            .await?;
        decode_search::<UserHit>(fetched, "user search")
    }

    /// `GET /search/repositories`, most starred first.
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, SearchError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("sort".to_string(), "stars".to_string()),
            ("order".to_string(), "desc".to_string()),
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        let fetched = self
            .inner
            .get(
                "/search/repositories",
                &params,
                Bucket::Search,
                CacheClass::Search,
            )
            .await?;
        decode_search::<RepoSummary>(fetched, "repository search")
    }

    /// `GET /users/{login}`. `None` when the user does not exist or the read
    /// failed.
    pub async fn get_user(&self, login: &str) -> Result<Option<RawProfile>, RateLimitError> {
        let endpoint = format!("/users/{}", login);
        let fetched = self
            .inner
            .get(&endpoint, &[], Bucket::General, CacheClass::Profile)
            .await?;
        Ok(decode(fetched, "user profile"))
    }

    /// `GET /users/{login}/repos`.
    pub async fn get_user_repos(
        &self,
        login: &str,
        sort: RepoSort,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, RateLimitError> {
        let endpoint = format!("/users/{}/repos", login);
        let params = vec![
            ("sort".to_string(), sort.as_str().to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        let fetched = self
            .inner
            .get(&endpoint, &params, Bucket::General, CacheClass::Repository)
            .await?;
        Ok(decode(fetched, "user repositories").unwrap_or_default())
    }

    /// `GET /repos/{owner}/{repo}/contributors`.
    pub async fn list_contributors(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<Contributor>, RateLimitError> {
        let endpoint = format!("/repos/{}/{}/contributors", owner, repo);
        let params = vec![("per_page".to_string(), per_page.to_string())];
        let fetched = self
            .inner
            .get(&endpoint, &params, Bucket::General, CacheClass::Repository)
            .await?;
        Ok(decode(fetched, "contributors").unwrap_or_default())
    }

    /// `GET /repos/{owner}/{repo}/commits`, newest first.
    pub async fn get_repo_commits(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>, RateLimitError> {
        let endpoint = format!("/repos/{}/{}/commits", owner, repo);
        let params = vec![("per_page".to_string(), per_page.to_string())];
        let fetched = self
            .inner
            .get(&endpoint, &params, Bucket::General, CacheClass::Repository)
            .await?;
        Ok(decode(fetched, "commits").unwrap_or_default())
    }

    /// `GET /rate_limit`. Overwrites the local bucket state with the answer.
    pub async fn rate_limit_status(&self) -> Result<RateLimitSnapshot, GitHubError> {
        let response = self.inner.get_unmetered("/rate_limit").await?;
        if response.status != 200 {
            return Err(GitHubError::Api {
                status: response.status,
                message: response.body,
            });
        }

        let body: RateLimitBody = serde_json::from_str(&response.body)?;
        let snapshot = RateLimitSnapshot {
            general: body.resources.core.into(),
            search: body.resources.search.into(),
        };

        let limiter = self.inner.limiter();
        limiter.set_state(Bucket::General, snapshot.general);
        limiter.set_state(Bucket::Search, snapshot.search);
        info!(
            general = snapshot.general.remaining,
            search = snapshot.search.remaining,
            "Rate limit status refreshed"
        );
        Ok(snapshot)
    }
}

/// Decode a search page. 404 is an empty page; a failed request or an
/// undecodable body is an error.
fn decode_search<T: DeserializeOwned>(
    fetched: Fetched,
    what: &'static str,
) -> Result<Vec<T>, SearchError> {
    match fetched {
        Fetched::Body(body) => serde_json::from_str::<SearchPage<T>>(&body)
            .map(|page| page.items)
            .map_err(|e| SearchError::Failed {
                what,
                reason: format!("undecodable response: {}", e),
            }),
        Fetched::NotFound => Ok(Vec::new()),
        Fetched::Failed { status, reason } => {
            warn!(what, ?status, %reason, "GitHub search failed");
            let reason = match status {
                Some(status) => format!("status {}: {}", status, reason),
                None => reason,
            };
            Err(SearchError::Failed { what, reason })
        }
    }
}

/// Decode a successful body, logging and discarding anything else.
fn decode<T: DeserializeOwned>(fetched: Fetched, what: &str) -> Option<T> {
    match fetched {
        Fetched::Body(body) => match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(what, error = %e, "Failed to decode GitHub response");
                None
            }
        },
        Fetched::NotFound => None,
        Fetched::Failed { status, reason } => {
            warn!(what, ?status, %reason, "GitHub read failed, treating as empty");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::json;

    fn setup() -> (Arc<FakeTransport>, GitHubClient) {
        let transport = Arc::new(FakeTransport::new());
        let client = GitHubClient::with_transport(transport.clone(), "http://github.test/");
        (transport, client)
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_users_decodes_items() {
        let (transport, client) = setup();
        transport.respond_json(
            "/search/users",
            json!({
                "total_count": 2,
                "items": [
                    {"login": "octocat", "type": "User"},
                    {"login": "github", "type": "Organization"}
                ]
            }),
        );

        let hits = client.search_users("rust", 1, 15).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].login, "octocat");
        assert_eq!(client.rate_limiter().state(Bucket::Search).remaining, 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_is_an_error() {
        let (transport, client) = setup();
        transport.fail("/search/users", TransportError::Timeout);

        let result = client.search_users("rust", 1, 15).await;

        match result {
            Err(SearchError::Failed { what, reason }) => {
                assert_eq!(what, "user search");
                assert!(reason.contains("timed out"), "reason: {}", reason);
            }
            other => panic!("expected failed search, got {:?}", other),
        }
        assert_eq!(transport.calls("/search/users"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repository_search_status_error_is_reported() {
        let (transport, client) = setup();
        transport.respond(
            "/search/repositories",
            HttpResponse::new(422, "Validation Failed"),
        );

        let result = client.search_repositories("language:", 1, 3).await;
        assert!(matches!(result, Err(SearchError::Failed { what: "repository search", .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_user_is_none() {
        let (_transport, client) = setup();
        assert_eq!(client.get_user("nobody").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_read_is_empty() {
        let (transport, client) = setup();
        transport.respond(
            "/repos/acme/widget/contributors",
            HttpResponse::new(500, "boom"),
        );

        let contributors = client.list_contributors("acme", "widget", 10).await.unwrap();
        assert!(contributors.is_empty());
        assert_eq!(transport.calls("/repos/acme/widget/contributors"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body_is_empty() {
        let (transport, client) = setup();
        transport.respond("/users/octocat/repos", HttpResponse::new(200, "not json"));

        let repos = client
            .get_user_repos("octocat", RepoSort::Pushed, 5)
            .await
            .unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_status_overwrites_state() {
        let (transport, client) = setup();
        transport.respond_json(
            "/rate_limit",
            json!({
                "resources": {
                    "core": {"limit": 5000, "remaining": 4321, "reset": 1_900_000_000},
                    "search": {"limit": 30, "remaining": 2, "reset": 1_900_000_060}
                }
            }),
        );

        let snapshot = client.rate_limit_status().await.unwrap();
        assert_eq!(snapshot.general.remaining, 4321);
        assert_eq!(snapshot.search.reset_epoch, 1_900_000_060);
        assert_eq!(client.rate_limiter().state(Bucket::Search), snapshot.search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_status_reports_api_error() {
        let (transport, client) = setup();
        transport.respond("/rate_limit", HttpResponse::new(401, "Bad credentials"));

        let result = client.rate_limit_status().await;
        assert!(matches!(result, Err(GitHubError::Api { status: 401, .. })));
    }
}
