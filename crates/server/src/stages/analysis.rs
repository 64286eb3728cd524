//! Analysis stage: accepted candidates in, analyzed candidates out.
//!
//! For each candidate:
//! 1. Gather evidence: the 5 most starred repositories and the first lines
//!    of 5 recent commits of the top one
//! 2. Skip the candidate when it has no repositories
//! 3. Report the 3 most starred repositories as `repo_analyzed`
//! 4. Ask the scorer; a scorer error yields the neutral analysis
//!
//! When evidence cannot be gathered because the API budget is gone, the
//! candidate is still forwarded with the neutral analysis.

use super::{StageInput, StageMessage, StageOutput};
use crate::events::EventEmitter;
use async_trait::async_trait;
use github_client::{GitHubClient, RateLimitError, RepoSort};
use llm_client::{CandidateScorer, ScoringRequest, fallback_analysis, score_or_fallback};
use scout_model::{AnalyzedCandidate, CandidateProfile, JobDescription, RepoSummary};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const TOP_REPOSITORIES: usize = 5;
pub const COMMIT_MESSAGES: usize = 5;
/// Repositories reported as reviewed per candidate.
pub const REPOS_REPORTED: usize = 3;

/// Repositories listed to pick the most starred from.
const REPOS_LISTED: u32 = 30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// Most starred first.
    pub repositories: Vec<RepoSummary>,
    pub commit_messages: Vec<String>,
}

#[async_trait]
pub trait EvidenceSource: Send + Sync {
    async fn gather(&self, username: &str) -> Result<Evidence, RateLimitError>;
}

/// Evidence read from the GitHub API.
pub struct GitHubEvidence {
    client: GitHubClient,
}

impl GitHubEvidence {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EvidenceSource for GitHubEvidence {
    async fn gather(&self, username: &str) -> Result<Evidence, RateLimitError> {
        let mut repositories = self
            .client
            .get_user_repos(username, RepoSort::Updated, REPOS_LISTED)
            .await?;
        repositories.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
        repositories.truncate(TOP_REPOSITORIES);

        let mut commit_messages = Vec::new();
        if let Some(top) = repositories.first() {
            let owner = if top.owner.login.is_empty() {
                username
            } else {
                top.owner.login.as_str()
            };
            let commits = self
                .client
                .get_repo_commits(owner, &top.name, COMMIT_MESSAGES as u32)
                .await?;
            commit_messages = commits
                .iter()
                .map(|c| c.headline().trim().to_string())
                .filter(|m| !m.is_empty())
                .take(COMMIT_MESSAGES)
                .collect();
        }

        Ok(Evidence {
            repositories,
            commit_messages,
        })
    }
}

pub struct AnalysisStage {
    scorer: Arc<dyn CandidateScorer>,
    evidence: Arc<dyn EvidenceSource>,
}

impl AnalysisStage {
    pub fn new(scorer: Arc<dyn CandidateScorer>, evidence: Arc<dyn EvidenceSource>) -> Self {
        Self { scorer, evidence }
    }

    /// Consume `input` until end of stream. Returns the number of
    /// candidates forwarded.
    #[instrument(skip_all, fields(job_id = %job.id))]
    pub async fn run(
        self,
        job: &JobDescription,
        mut input: StageInput<CandidateProfile>,
        events: EventEmitter,
        output: StageOutput<AnalyzedCandidate>,
    ) -> usize {
        let mut analyzed = 0;
        let mut skipped = 0;

        while let StageMessage::Item(profile) = input.recv().await {
            let Some(candidate) = self.analyze(job, profile, &events).await else {
                skipped += 1;
                continue;
            };

            events.emit(
                "candidate_analyzed",
                format!(
                    "{} scored {}",
                    candidate.profile.username, candidate.analysis.fit_score
                ),
                json!({
                    "username": candidate.profile.username,
                    "fit_score": candidate.analysis.fit_score,
                    "skills": candidate.analysis.skills,
                }),
            );
            analyzed += 1;
            if !output.send(candidate) {
                break;
            }
        }
        output.finish();

        events.emit(
            "analysis_completed",
            format!("Analyzed {} candidates", analyzed),
            json!({"analyzed": analyzed, "skipped": skipped}),
        );
        analyzed
    }

    async fn analyze(
        &self,
        job: &JobDescription,
        profile: CandidateProfile,
        events: &EventEmitter,
    ) -> Option<AnalyzedCandidate> {
        let evidence = match self.evidence.gather(&profile.username).await {
            Ok(evidence) => evidence,
            Err(e) => {
                warn!(username = %profile.username, error = %e, "No evidence, using neutral analysis");
                return Some(AnalyzedCandidate {
                    profile,
                    analysis: fallback_analysis(&[]),
                });
            }
        };

        if evidence.repositories.is_empty() {
            debug!(username = %profile.username, "No repositories, skipping");
            events.emit(
                "candidate_skipped",
                format!("{} has no repositories", profile.username),
                json!({"username": profile.username}),
            );
            return None;
        }

        for repo in evidence.repositories.iter().take(REPOS_REPORTED) {
            let language = repo.language.as_deref().unwrap_or("Unknown");
            events.emit(
                "repo_analyzed",
                format!(
                    "Reviewing project: {} ({} stars, {})",
                    repo.name, repo.stargazers_count, language
                ),
                json!({
                    "repo": repo.name,
                    "stars": repo.stargazers_count,
                    "language": language,
                }),
            );
        }

        let request = ScoringRequest {
            job_title: job.title.clone(),
            job_description: job.description.clone(),
            profile,
            repositories: evidence.repositories,
            commit_messages: evidence.commit_messages,
        };
        let analysis = score_or_fallback(self.scorer.as_ref(), &request).await;

        Some(AnalyzedCandidate {
            profile: request.profile,
            analysis,
        })
    }
}
