//! Collaborator clients for keyword extraction and candidate scoring.
//!
//! The sourcing engine talks to an LLM-backed service for two things:
//! - turning a job description into a structured [`KeywordBundle`]
//! - assessing a candidate's fit from their profile and repositories
//!
//! Both are modelled as traits so that the pipeline can run against the
//! HTTP adapter, the local fallbacks, or test doubles. Failures never stop
//! a run: callers go through [`extract_or_fallback`] and
//! [`score_or_fallback`].

pub mod error;
pub mod fallback;
pub mod http;

pub use error::LlmError;
pub use fallback::{
    NeutralScorer, VocabularyExtractor, extract_or_fallback, fallback_analysis, fallback_keywords,
    score_or_fallback,
};
pub use http::HttpLlmClient;

use async_trait::async_trait;
use scout_model::{CandidateAnalysis, CandidateProfile, JobDescription, KeywordBundle, RepoSummary};
use serde::Serialize;

/// Turns a job description into search keywords.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract_keywords(&self, job: &JobDescription) -> Result<KeywordBundle, LlmError>;
}

/// Assesses how well a candidate fits a job.
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    async fn score_candidate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CandidateAnalysis, LlmError>;
}

/// Everything the scorer gets to see about one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringRequest {
    pub job_title: String,
    pub job_description: String,
    pub profile: CandidateProfile,
    /// Most starred repositories first.
    pub repositories: Vec<RepoSummary>,
    /// First lines of recent commit messages from the top repository.
    pub commit_messages: Vec<String>,
}
