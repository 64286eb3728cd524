//! Helper functions to build a SearchContext for a job.
//!
//! The context gathers everything strategy generation needs up front, so
//! that building strategies is a pure function of the context (plus the
//! shuffle seed).

use chrono::{NaiveDate, Utc};
use scout_model::{JobDescription, KeywordBundle};

/// Inputs to strategy generation for one run of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub keywords: KeywordBundle,
    pub location: Option<String>,
    /// Candidates already found for this job in earlier runs.
    pub seen_count: usize,
    /// Anchor for the relative date qualifiers.
    pub today: NaiveDate,
}

impl SearchContext {
    pub fn new(keywords: KeywordBundle) -> Self {
        Self {
            keywords: keywords.normalized(),
            location: None,
            seen_count: 0,
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_seen_count(mut self, seen_count: usize) -> Self {
        self.seen_count = seen_count;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Build the context for a job from its extracted keywords.
pub fn build_search_context(
    job: &JobDescription,
    keywords: KeywordBundle,
    seen_count: usize,
) -> SearchContext {
    SearchContext::new(keywords)
        .with_location(job.search_location())
        .with_seen_count(seen_count)
}
