//! Recent-activity check.
//!
//! A profile is active when any of its most recently pushed repositories
//! saw a push inside the activity window. When activity cannot be
//! determined (no repositories returned, or the lookup failed) the profile
//! passes. An activity error aborts the decision instead.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use scout_model::RepoSummary;

/// Number of most recently pushed repositories inspected.
pub const REPOS_INSPECTED: usize = 5;

/// Default activity window.
pub const ACTIVITY_WINDOW_DAYS: i64 = 180;

/// Source of a user's most recently pushed repositories.
#[async_trait]
pub trait ActivityCheck: Send + Sync {
    /// Failure that stops screening altogether, e.g. an exhausted budget.
    type Error: Send;

    /// Repositories sorted by push date, newest first. `Ok(None)` when they
    /// could not be fetched.
    async fn recent_repositories(
        &self,
        username: &str,
    ) -> Result<Option<Vec<RepoSummary>>, Self::Error>;
}

/// Whether any of the first [`REPOS_INSPECTED`] repositories was pushed
/// after `now - window`. An empty list counts as active.
pub fn has_recent_push(repos: &[RepoSummary], now: DateTime<Utc>, window: Duration) -> bool {
    if repos.is_empty() {
        return true;
    }
    let cutoff = now - window;
    repos
        .iter()
        .take(REPOS_INSPECTED)
        .filter_map(|r| r.pushed_at)
        .any(|pushed| pushed > cutoff)
}
