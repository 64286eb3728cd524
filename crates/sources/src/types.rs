//! Strategy and result types for the search phase.

use scout_model::CandidateProfile;
use serde::{Deserialize, Serialize};

/// How a strategy turns its query into usernames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    /// `GET /search/users` with the query.
    UserSearch,
    /// `GET /search/repositories` with the query, then the contributors of
    /// the top `max_repositories` results.
    RepositoryContributors { max_repositories: u32 },
}

/// One independently executable search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStrategy {
    pub name: String,
    pub description: String,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub kind: StrategyKind,
}

impl SearchStrategy {
    pub fn is_user_search(&self) -> bool {
        self.kind == StrategyKind::UserSearch
    }
}

/// Whether a strategy ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Success,
    Failed { reason: String },
}

/// What one strategy execution produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub strategy_name: String,
    pub candidates: Vec<CandidateProfile>,
    pub outcome: SearchOutcome,
}

impl SearchResult {
    pub fn success(strategy_name: impl Into<String>, candidates: Vec<CandidateProfile>) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            candidates,
            outcome: SearchOutcome::Success,
        }
    }

    pub fn failed(strategy_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            candidates: Vec::new(),
            outcome: SearchOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == SearchOutcome::Success
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            SearchOutcome::Success => None,
            SearchOutcome::Failed { reason } => Some(reason),
        }
    }
}
