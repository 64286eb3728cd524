//! # Parallel Search Executor
//!
//! Runs search strategies in sequential batches of concurrent tasks.
//!
//! ## Algorithm
//! 1. Split the strategies into batches (default 3 per batch)
//! 2. For each batch:
//!    - Sleep the courtesy delay first (every batch but the first)
//!    - Spawn every member into a `JoinSet`; the batch ends when all of
//!      them finished (barrier)
//!    - A failed or panicked member becomes a failed [`SearchResult`];
//!      its siblings are unaffected
//!    - Rate-limit exhaustion aborts the whole run
//!    - Stop when the accepted count reached the cap
//! 3. Deduplicate by username, sort by quality score (highest first, ties
//!    by username) and truncate to the cap
//!
//! Batches never overlap, so at most `batch_size` strategies spend API
//! budget at once.

use crate::events::EventEmitter;
use github_client::RateLimitError;
use scout_model::CandidateProfile;
use serde_json::json;
use sources::{SearchResult, SearchStrategy, StrategyError, StrategyRunner};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// One entry per executed strategy, in strategy order.
    pub results: Vec<SearchResult>,
    /// Deduplicated, ranked and capped.
    pub candidates: Vec<CandidateProfile>,
    pub batches_run: usize,
    /// Whether batches were skipped because the cap was reached.
    pub stopped_early: bool,
}

impl SearchReport {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

pub struct ParallelSearchExecutor {
    runner: Arc<dyn StrategyRunner>,
    batch_size: usize,
    batch_delay: Duration,
    max_candidates: usize,
    events: Option<EventEmitter>,
}

impl ParallelSearchExecutor {
    /// Batches of 3, 1 s apart, at most 10 candidates.
    pub fn new(runner: Arc<dyn StrategyRunner>) -> Self {
        Self {
            runner,
            batch_size: 3,
            batch_delay: Duration::from_secs(1),
            max_candidates: 10,
            events: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = Some(events);
        self
    }

    /// Accepted candidates only.
    pub async fn run(
        &self,
        strategies: Vec<SearchStrategy>,
    ) -> Result<Vec<CandidateProfile>, RateLimitError> {
        Ok(self.run_with_report(strategies).await?.candidates)
    }

    #[instrument(skip_all, fields(strategies = strategies.len()))]
    pub async fn run_with_report(
        &self,
        strategies: Vec<SearchStrategy>,
    ) -> Result<SearchReport, RateLimitError> {
        let batches: Vec<Vec<SearchStrategy>> = strategies
            .chunks(self.batch_size)
            .map(<[SearchStrategy]>::to_vec)
            .collect();
        let total_batches = batches.len();

        let mut results = Vec::new();
        let mut accepted = 0;
        let mut batches_run = 0;
        let mut stopped_early = false;

        for (index, batch) in batches.into_iter().enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let names: Vec<&str> = batch.iter().map(|s| s.name.as_str()).collect();
            info!(batch = index + 1, total_batches, "Starting batch: {}", names.join(", "));
            self.emit(
                "batch_started",
                format!("Batch {}/{} started", index + 1, total_batches),
                json!({"batch": index + 1, "total_batches": total_batches, "strategies": names}),
            );

            let batch_results = self.run_batch(batch).await?;
            batches_run += 1;

            let batch_found: usize = batch_results.iter().map(|r| r.candidates.len()).sum();
            accepted += batch_found;
            self.emit(
                "batch_completed",
                format!("Batch {}/{} found {} candidates", index + 1, total_batches, batch_found),
                json!({"batch": index + 1, "found": batch_found, "total_found": accepted}),
            );
            results.extend(batch_results);

            if accepted >= self.max_candidates && index + 1 < total_batches {
                info!(accepted, cap = self.max_candidates, "Candidate cap reached, stopping");
                stopped_early = true;
                break;
            }
        }

        let candidates = rank_candidates(&results, self.max_candidates);
        info!(
            found = candidates.len(),
            failed = results.iter().filter(|r| !r.is_success()).count(),
            "Search finished"
        );

        Ok(SearchReport {
            results,
            candidates,
            batches_run,
            stopped_early,
        })
    }

    /// Run one batch to completion. Results come back in strategy order.
    async fn run_batch(
        &self,
        batch: Vec<SearchStrategy>,
    ) -> Result<Vec<SearchResult>, RateLimitError> {
        let names: Vec<String> = batch.iter().map(|s| s.name.clone()).collect();
        let mut slots: Vec<Option<SearchResult>> = vec![None; batch.len()];

        let mut set = JoinSet::new();
        for (index, strategy) in batch.into_iter().enumerate() {
            let runner = self.runner.clone();
            set.spawn(async move {
                let outcome = runner.run_strategy(&strategy).await;
                (index, outcome)
            });
        }

        // Dropping the set on an early return aborts the remaining members.
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(candidates))) => {
                    self.emit(
                        "strategy_completed",
                        format!("{} found {} candidates", names[index], candidates.len()),
                        json!({"strategy": names[index], "found": candidates.len()}),
                    );
                    slots[index] = Some(SearchResult::success(names[index].clone(), candidates));
                }
                Ok((index, Err(StrategyError::RateLimited(e)))) => {
                    warn!(strategy = %names[index], error = %e, "Rate limit exhausted, aborting run");
                    return Err(e);
                }
                Ok((index, Err(StrategyError::Failed(reason)))) => {
                    slots[index] = Some(self.failed(&names[index], reason));
                }
                Err(e) => {
                    warn!(error = %e, "Strategy task did not complete");
                }
            }
        }

        Ok(slots
            .into_iter()
            .zip(&names)
            .map(|(slot, name)| {
                slot.unwrap_or_else(|| self.failed(name, "strategy task panicked".to_string()))
            })
            .collect())
    }

    fn failed(&self, name: &str, reason: String) -> SearchResult {
        warn!(strategy = name, %reason, "Strategy failed");
        self.emit(
            "strategy_failed",
            format!("{} failed: {}", name, reason),
            json!({"strategy": name, "reason": reason}),
        );
        SearchResult::failed(name, reason)
    }

    fn emit(&self, event_type: &str, message: String, payload: serde_json::Value) {
        if let Some(events) = &self.events {
            events.emit(event_type, message, payload);
        }
    }
}

/// Unique usernames, best quality score first, at most `cap`.
fn rank_candidates(results: &[SearchResult], cap: usize) -> Vec<CandidateProfile> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<CandidateProfile> = results
        .iter()
        .flat_map(|r| r.candidates.iter())
        .filter(|c| seen.insert(c.dedup_key()))
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        b.quality_score
            .cmp(&a.quality_score)
            .then_with(|| a.username.cmp(&b.username))
    });
    candidates.truncate(cap);
    candidates
}
