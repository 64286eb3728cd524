//! # Agent Pipeline
//!
//! Sourcing → Analysis → Engagement, each stage its own task, connected by
//! ordered channels.
//!
//! ## Algorithm
//! 1. Spawn the sourcing stage (keywords, strategies, search)
//! 2. Spawn the analysis stage, reading what sourcing forwards
//! 3. Run engagement on the current task until end of stream
//! 4. Join the stage tasks and report
//!
//! Every stage ends its output stream whether it succeeds, fails or
//! panics, so step 3 always terminates. A rate-limited or crashed sourcing
//! stage is reported in [`PipelineOutcome::sourcing_error`] next to
//! whatever was analyzed before it stopped.

use crate::events::{EventEmitter, ProgressSink, Stage};
use crate::stages::{AnalysisStage, EngagementStage, SourcingStage, stage_channel};
use github_client::RateLimitError;
use scout_model::{AnalyzedCandidate, JobDescription};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

#[derive(Debug, Error)]
pub enum SourcingError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error("sourcing stage crashed: {0}")]
    Crashed(String),
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub candidates: Vec<AnalyzedCandidate>,
    pub sourcing_error: Option<SourcingError>,
}

impl PipelineOutcome {
    pub fn average_fit_score(&self) -> Option<f64> {
        if self.candidates.is_empty() {
            return None;
        }
        let total: u32 = self
            .candidates
            .iter()
            .map(|c| c.analysis.fit_score as u32)
            .sum();
        Some(total as f64 / self.candidates.len() as f64)
    }

    /// The candidates, or the sourcing error if there was one.
    pub fn into_result(self) -> Result<Vec<AnalyzedCandidate>, SourcingError> {
        match self.sourcing_error {
            Some(e) => Err(e),
            None => Ok(self.candidates),
        }
    }
}

pub struct AgentPipeline {
    sourcing: SourcingStage,
    analysis: AnalysisStage,
    engagement: EngagementStage,
    sink: Arc<dyn ProgressSink>,
}

impl AgentPipeline {
    pub fn new(
        sourcing: SourcingStage,
        analysis: AnalysisStage,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            sourcing,
            analysis,
            engagement: EngagementStage::new(),
            sink,
        }
    }

    #[instrument(skip_all, fields(job_id = %job.id))]
    pub async fn run(self, job: JobDescription, seen_count: usize) -> PipelineOutcome {
        let job = Arc::new(job);
        let events = EventEmitter::new(job.id.clone(), Stage::Pipeline, self.sink.clone());
        events.emit(
            "started",
            format!("Sourcing candidates for {}", job.title),
            json!({"title": job.title, "seen_count": seen_count}),
        );

        let (sourced_out, sourced_in) = stage_channel();
        let (analyzed_out, analyzed_in) = stage_channel();

        let sourcing = tokio::spawn({
            let job = job.clone();
            let stage = self.sourcing;
            let events = events.for_stage(Stage::Hunter);
            async move { stage.run(&job, seen_count, events, sourced_out).await }
        });

        let analysis = tokio::spawn({
            let job = job.clone();
            let stage = self.analysis;
            let events = events.for_stage(Stage::Analyzer);
            async move { stage.run(&job, sourced_in, events, analyzed_out).await }
        });

        let candidates = self
            .engagement
            .run(analyzed_in, events.for_stage(Stage::Engager))
            .await;

        let sourcing_error = match sourcing.await {
            Ok(Ok(found)) => {
                info!(found, "Sourcing finished");
                None
            }
            Ok(Err(e)) => Some(SourcingError::RateLimited(e)),
            Err(e) => {
                error!(error = %e, "Sourcing stage crashed");
                Some(SourcingError::Crashed(e.to_string()))
            }
        };
        if let Err(e) = analysis.await {
            error!(error = %e, "Analysis stage crashed");
        }

        let outcome = PipelineOutcome {
            candidates,
            sourcing_error,
        };
        let average = outcome.average_fit_score();
        events.emit(
            "completed",
            format!(
                "{} candidates, average fit {}",
                outcome.candidates.len(),
                average.map_or("n/a".to_string(), |a| format!("{:.1}", a))
            ),
            json!({
                "total": outcome.candidates.len(),
                "average_fit_score": average,
                "error": outcome.sourcing_error.as_ref().map(|e| e.to_string()),
            }),
        );
        outcome
    }
}
