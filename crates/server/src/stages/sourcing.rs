//! Sourcing stage: job description in, accepted candidate profiles out.
//!
//! 1. Extract keywords (local vocabulary fallback on collaborator errors)
//! 2. Build search strategies
//! 3. Run them through the [`ParallelSearchExecutor`]
//! 4. Forward every accepted candidate downstream

use super::StageOutput;
use crate::events::EventEmitter;
use crate::executor::ParallelSearchExecutor;
use github_client::RateLimitError;
use llm_client::{KeywordExtractor, extract_or_fallback};
use scout_model::{CandidateProfile, JobDescription};
use serde_json::json;
use sources::{StrategyBuilder, StrategyRunner, build_search_context};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Executor settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub max_candidates: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_delay: Duration::from_secs(1),
            max_candidates: 10,
        }
    }
}

pub struct SourcingStage {
    extractor: Arc<dyn KeywordExtractor>,
    runner: Arc<dyn StrategyRunner>,
    builder: StrategyBuilder,
    settings: SearchSettings,
}

impl SourcingStage {
    pub fn new(extractor: Arc<dyn KeywordExtractor>, runner: Arc<dyn StrategyRunner>) -> Self {
        Self {
            extractor,
            runner,
            builder: StrategyBuilder::new(),
            settings: SearchSettings::default(),
        }
    }

    pub fn with_builder(mut self, builder: StrategyBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the number of candidates forwarded. `output` is ended on
    /// every path, including the rate-limit error.
    #[instrument(skip_all, fields(job_id = %job.id))]
    pub async fn run(
        self,
        job: &JobDescription,
        seen_count: usize,
        events: EventEmitter,
        output: StageOutput<CandidateProfile>,
    ) -> Result<usize, RateLimitError> {
        let keywords = extract_or_fallback(self.extractor.as_ref(), job).await;
        events.emit(
            "keywords_extracted",
            format!("Searching for {}", keywords.core_languages.join(", ")),
            json!(keywords),
        );

        let context = build_search_context(job, keywords, seen_count);
        let strategies = self.builder.build(&context);
        info!(count = strategies.len(), seen_count, "Strategies built");
        events.emit(
            "strategies_built",
            format!("{} search strategies", strategies.len()),
            json!({
                "count": strategies.len(),
                "strategies": strategies.iter().map(|s| &s.name).collect::<Vec<_>>(),
            }),
        );

        let executor = ParallelSearchExecutor::new(self.runner)
            .with_batch_size(self.settings.batch_size)
            .with_batch_delay(self.settings.batch_delay)
            .with_max_candidates(self.settings.max_candidates)
            .with_events(events.clone());

        let report = match executor.run_with_report(strategies).await {
            Ok(report) => report,
            Err(e) => {
                events.emit(
                    "search_failed",
                    format!("GitHub rate limit exhausted until {}", e.reset_at),
                    json!({"bucket": e.bucket, "reset_at": e.reset_at}),
                );
                return Err(e);
            }
        };

        let found = report.candidates.len();
        for candidate in report.candidates {
            events.emit(
                "profile_found",
                format!("Found {}", candidate.username),
                json!({
                    "username": candidate.username,
                    "quality_score": candidate.quality_score,
                    "profile_url": candidate.profile_url,
                }),
            );
            if !output.send(candidate) {
                break;
            }
        }
        output.finish();

        events.emit(
            "search_completed",
            format!("Found {} candidates", found),
            json!({
                "found": found,
                "failed_strategies": report.results.iter().filter(|r| !r.is_success()).count(),
                "batches_run": report.batches_run,
                "stopped_early": report.stopped_early,
            }),
        );
        Ok(found)
    }
}
