//! # Recruiting Orchestrator
//!
//! Entry point for sourcing runs. Owns the long-lived resources (GitHub
//! client with its rate-limit state and cache, collaborator clients,
//! quality filter) and assembles a fresh [`AgentPipeline`] per run.
//!
//! ## Operations
//! - `start_job`: first run for a job
//! - `find_more`: rerun seeded with the usernames already found, so the
//!   page offset moves forward and known people are skipped
//! - `plan_strategies`: keywords and strategies only, no search
//! - `rate_limit_status`: current GitHub budget

use crate::agent_pipeline::{AgentPipeline, PipelineOutcome};
use crate::config::ScoutConfig;
use crate::events::{ProgressSink, TracingSink};
use crate::stages::{AnalysisStage, GitHubEvidence, SearchSettings, SourcingStage};
use anyhow::{Context, Result};
use github_client::{GitHubClient, RateLimitSnapshot};
use llm_client::{
    CandidateScorer, HttpLlmClient, KeywordExtractor, NeutralScorer, VocabularyExtractor,
    extract_or_fallback,
};
use pipeline::{Deduplicator, QualityFilter};
use scout_model::{AnalyzedCandidate, JobDescription, Username};
use sources::{GitHubSearcher, SearchStrategy, StrategyBuilder, build_search_context};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RecruitingOrchestrator {
    config: ScoutConfig,
    github: GitHubClient,
    extractor: Arc<dyn KeywordExtractor>,
    scorer: Arc<dyn CandidateScorer>,
    filter: Arc<QualityFilter>,
    sink: Arc<dyn ProgressSink>,
    strategy_seed: Option<u64>,
}

impl RecruitingOrchestrator {
    /// Connect to GitHub and, when configured, to the LLM service.
    /// Without an LLM service the local fallbacks are used.
    pub fn new(config: ScoutConfig) -> Result<Self> {
        let github =
            GitHubClient::new(config.github_config()).context("Failed to create GitHub client")?;

        let extractor: Arc<dyn KeywordExtractor>;
        let scorer: Arc<dyn CandidateScorer>;
        match &config.llm_service_url {
            Some(url) => {
                let client = Arc::new(
                    HttpLlmClient::new(url.as_str(), config.http_timeout)
                        .context("Failed to create LLM service client")?,
                );
                extractor = client.clone();
                scorer = client;
            }
            None => {
                info!("No LLM service configured, using local keyword and scoring fallbacks");
                extractor = Arc::new(VocabularyExtractor);
                scorer = Arc::new(NeutralScorer);
            }
        }

        Ok(Self::from_parts(config, github, extractor, scorer))
    }

    /// Assemble from already constructed clients.
    pub fn from_parts(
        config: ScoutConfig,
        github: GitHubClient,
        extractor: Arc<dyn KeywordExtractor>,
        scorer: Arc<dyn CandidateScorer>,
    ) -> Self {
        let filter =
            Arc::new(QualityFilter::new().with_activity_check(config.check_recent_activity));
        Self {
            config,
            github,
            extractor,
            scorer,
            filter,
            sink: Arc::new(TracingSink),
            strategy_seed: None,
        }
    }

    /// Route progress events to `sink` (default: the log)
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fix the strategy shuffle seed
    pub fn with_strategy_seed(mut self, seed: u64) -> Self {
        self.strategy_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// First sourcing run for a job.
    pub async fn start_job(&self, job: JobDescription) -> Result<Vec<AnalyzedCandidate>> {
        self.run_job(job, Vec::new())
            .await
            .into_result()
            .context("Sourcing run failed")
    }

    /// Another run for a job, skipping the usernames already found.
    pub async fn find_more(
        &self,
        job: JobDescription,
        seen: Vec<Username>,
    ) -> Result<Vec<AnalyzedCandidate>> {
        self.run_job(job, seen)
            .await
            .into_result()
            .context("Sourcing run failed")
    }

    /// Full outcome of a run, including partial results of a failed one.
    #[instrument(skip_all, fields(job_id = %job.id, seen = seen.len()))]
    pub async fn run_job(&self, job: JobDescription, seen: Vec<Username>) -> PipelineOutcome {
        let start = Instant::now();
        let seen_count = seen.len();
        let dedup = Arc::new(Deduplicator::seeded(seen));

        let searcher = GitHubSearcher::new(self.github.clone(), self.filter.clone(), dedup);
        let sourcing = SourcingStage::new(self.extractor.clone(), Arc::new(searcher))
            .with_builder(self.strategy_builder())
            .with_settings(SearchSettings {
                batch_size: self.config.search_batch_size,
                batch_delay: self.config.batch_delay,
                max_candidates: self.config.max_candidates_per_job,
            });
        let analysis = AnalysisStage::new(
            self.scorer.clone(),
            Arc::new(GitHubEvidence::new(self.github.clone())),
        );

        let outcome = AgentPipeline::new(sourcing, analysis, self.sink.clone())
            .run(job, seen_count)
            .await;

        info!(
            candidates = outcome.candidates.len(),
            failed = outcome.sourcing_error.is_some(),
            "Run finished in {:.2?}",
            start.elapsed()
        );
        outcome
    }

    /// Strategies a run would execute, without searching.
    pub async fn plan_strategies(
        &self,
        job: &JobDescription,
        seen_count: usize,
    ) -> Vec<SearchStrategy> {
        let keywords = extract_or_fallback(self.extractor.as_ref(), job).await;
        let context = build_search_context(job, keywords, seen_count);
        self.strategy_builder().build(&context)
    }

    /// Ask GitHub for the remaining budget of both buckets.
    pub async fn rate_limit_status(&self) -> Result<RateLimitSnapshot> {
        self.github
            .rate_limit_status()
            .await
            .context("Failed to query GitHub rate limit")
    }

    fn strategy_builder(&self) -> StrategyBuilder {
        match self.strategy_seed {
            Some(seed) => StrategyBuilder::new().with_seed(seed),
            None => StrategyBuilder::new(),
        }
    }
}
