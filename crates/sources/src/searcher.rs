//! Strategy execution against GitHub.
//!
//! A strategy yields candidate logins (directly from user search, or from
//! the contributor lists of popular repositories). Each login then goes
//! through:
//! 1. skip if already seen (no profile fetch)
//! 2. fetch the full profile
//! 3. quality filter, including the optional activity check
//! 4. claim the login in the shared deduplicator
//!
//! Rate-limit exhaustion aborts the run. A failed search request fails the
//! strategy. Every other failed read (profile, repositories, contributors)
//! resolves to "no candidates from here".

use crate::types::{SearchStrategy, StrategyKind};
use async_trait::async_trait;
use github_client::{GitHubClient, RateLimitError, RepoSort, SearchError};
use pipeline::activity::REPOS_INSPECTED;
use pipeline::{ActivityCheck, Deduplicator, QualityFilter};
use scout_model::{AccountKind, CandidateProfile, RepoSummary, Username};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error("{0}")]
    Failed(String),
}

impl From<SearchError> for StrategyError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::RateLimited(e) => StrategyError::RateLimited(e),
            failed @ SearchError::Failed { .. } => StrategyError::Failed(failed.to_string()),
        }
    }
}

/// Executes one strategy and returns the profiles it accepted.
#[async_trait]
pub trait StrategyRunner: Send + Sync {
    async fn run_strategy(
        &self,
        strategy: &SearchStrategy,
    ) -> Result<Vec<CandidateProfile>, StrategyError>;
}

/// Activity check reading a user's most recently pushed repositories.
///
/// A failed listing reads as "no repositories" and passes; an exhausted
/// budget is returned as an error.
#[derive(Clone)]
pub struct GitHubActivityCheck {
    client: GitHubClient,
}

impl GitHubActivityCheck {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActivityCheck for GitHubActivityCheck {
    type Error = RateLimitError;

    async fn recent_repositories(
        &self,
        username: &str,
    ) -> Result<Option<Vec<RepoSummary>>, RateLimitError> {
        let repos = self
            .client
            .get_user_repos(username, RepoSort::Pushed, REPOS_INSPECTED as u32)
            .await
            .inspect_err(|e| warn!(username, error = %e, "Activity check aborted"))?;
        Ok(Some(repos))
    }
}

pub struct GitHubSearcher {
    client: GitHubClient,
    filter: Arc<QualityFilter>,
    dedup: Arc<Deduplicator>,
    activity: GitHubActivityCheck,
    contributors_per_repo: u32,
}

impl GitHubSearcher {
    pub fn new(client: GitHubClient, filter: Arc<QualityFilter>, dedup: Arc<Deduplicator>) -> Self {
        Self {
            activity: GitHubActivityCheck::new(client.clone()),
            client,
            filter,
            dedup,
            contributors_per_repo: 10,
        }
    }

    /// Configure how many contributors are read per repository (default: 10)
    pub fn with_contributors_per_repo(mut self, count: u32) -> Self {
        self.contributors_per_repo = count.max(1);
        self
    }

    pub fn dedup(&self) -> &Arc<Deduplicator> {
        &self.dedup
    }

    async fn candidate_logins(
        &self,
        strategy: &SearchStrategy,
    ) -> Result<Vec<Username>, StrategyError> {
        match strategy.kind {
            StrategyKind::UserSearch => {
                let hits = self
                    .client
                    .search_users(&strategy.query, strategy.page, strategy.page_size)
                    .await?;
                Ok(hits
                    .into_iter()
                    .filter(|hit| hit.kind == AccountKind::User)
                    .map(|hit| hit.login)
                    .collect())
            }
            StrategyKind::RepositoryContributors { max_repositories } => {
                let repos = self
                    .client
                    .search_repositories(&strategy.query, strategy.page, max_repositories)
                    .await?;

                let mut seen = HashSet::new();
                let mut logins = Vec::new();
                for repo in repos.iter().take(max_repositories as usize) {
                    let Some((owner, name)) = repo_coordinates(repo) else {
                        continue;
                    };
                    let contributors = self
                        .client
                        .list_contributors(owner, name, self.contributors_per_repo)
                        .await?;
                    debug!(repo = %repo.full_name, count = contributors.len(), "Contributors listed");
                    logins.extend(
                        contributors
                            .into_iter()
                            .filter(|c| c.kind == AccountKind::User)
                            .filter(|c| seen.insert(c.login.to_ascii_lowercase()))
                            .map(|c| c.login),
                    );
                }
                Ok(logins)
            }
        }
    }

    async fn screen_login(&self, login: &str) -> Result<Option<CandidateProfile>, StrategyError> {
        if self.dedup.is_seen(login) {
            debug!(login, "Already seen, skipping profile fetch");
            return Ok(None);
        }

        let Some(raw) = self.client.get_user(login).await? else {
            return Ok(None);
        };

        let Some(candidate) = self.filter.accept(raw, &self.activity).await? else {
            return Ok(None);
        };

        if self.dedup.mark_accepted(&candidate.username) {
            Ok(Some(candidate))
        } else {
            debug!(login, "Accepted concurrently by another strategy");
            Ok(None)
        }
    }
}

/// `(owner, name)` of a repository, falling back to `full_name`.
fn repo_coordinates(repo: &RepoSummary) -> Option<(&str, &str)> {
    if !repo.owner.login.is_empty() && !repo.name.is_empty() {
        return Some((repo.owner.login.as_str(), repo.name.as_str()));
    }
    repo.full_name
        .split_once('/')
        .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
}

#[async_trait]
impl StrategyRunner for GitHubSearcher {
    #[instrument(skip(self, strategy), fields(strategy = %strategy.name))]
    async fn run_strategy(
        &self,
        strategy: &SearchStrategy,
    ) -> Result<Vec<CandidateProfile>, StrategyError> {
        if strategy.query.trim().is_empty() {
            return Err(StrategyError::Failed("empty search query".to_string()));
        }

        let logins = self.candidate_logins(strategy).await?;
        let mut accepted = Vec::new();
        for login in &logins {
            if let Some(candidate) = self.screen_login(login).await? {
                accepted.push(candidate);
            }
        }

        info!(hits = logins.len(), accepted = accepted.len(), "Strategy finished");
        Ok(accepted)
    }
}
