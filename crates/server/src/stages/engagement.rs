//! Engagement stage.
//!
//! Outreach messages are written on demand for the candidates a recruiter
//! picks, so this stage only collects the analyzed candidates until end of
//! stream and reports them as ready.

use super::{StageInput, StageMessage};
use crate::events::EventEmitter;
use scout_model::AnalyzedCandidate;
use serde_json::json;

#[derive(Debug, Default, Clone, Copy)]
pub struct EngagementStage;

impl EngagementStage {
    pub fn new() -> Self {
        Self
    }

    /// Candidates in arrival order.
    pub async fn run(
        self,
        mut input: StageInput<AnalyzedCandidate>,
        events: EventEmitter,
    ) -> Vec<AnalyzedCandidate> {
        let mut ready = Vec::new();
        while let StageMessage::Item(candidate) = input.recv().await {
            events.emit(
                "candidate_ready",
                format!("{} ready for outreach", candidate.profile.username),
                json!({
                    "username": candidate.profile.username,
                    "fit_score": candidate.analysis.fit_score,
                }),
            );
            ready.push(candidate);
        }

        events.emit(
            "engagement_deferred",
            format!("{} candidates awaiting outreach", ready.len()),
            json!({"count": ready.len()}),
        );
        ready
    }
}
