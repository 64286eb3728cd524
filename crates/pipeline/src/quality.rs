//! Acceptance decision for a fetched profile.
//!
//! ## Algorithm
//!
//! 1. Run the hard-reject rules in order, stopping at the first failure
//! 2. Compute the quality score; below the minimum is a rejection
//! 3. When enabled, ask the activity check for recently pushed
//!    repositories; no recent push is a rejection, unknown is a pass and a
//!    activity error is returned to the caller
//! 4. Build the [`CandidateProfile`]
//!
//! The score is checked before the activity check so rejected profiles
//! cost no extra request. Both are rejections, so the outcome is the same
//! as checking activity first.

use crate::activity::{ACTIVITY_WINDOW_DAYS, ActivityCheck, has_recent_push};
use crate::filter_pipeline::FilterPipeline;
use crate::scoring::{MIN_ACCEPTED_SCORE, quality_score};
use chrono::{Duration, Utc};
use scout_model::{CandidateProfile, RawProfile};
use tracing::debug;

/// Why a profile was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A hard-reject rule failed.
    Rule(String),
    LowScore(u8),
    Inactive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(CandidateProfile),
    Rejected(Rejection),
}

pub struct QualityFilter {
    rules: FilterPipeline,
    min_score: u8,
    check_activity: bool,
    activity_window: Duration,
}

impl QualityFilter {
    /// Standard rules, minimum score 3, activity check on.
    pub fn new() -> Self {
        Self {
            rules: FilterPipeline::standard(),
            min_score: MIN_ACCEPTED_SCORE,
            check_activity: true,
            activity_window: Duration::days(ACTIVITY_WINDOW_DAYS),
        }
    }

    pub fn with_rules(mut self, rules: FilterPipeline) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_activity_check(mut self, enabled: bool) -> Self {
        self.check_activity = enabled;
        self
    }

    pub fn with_activity_window(mut self, window: Duration) -> Self {
        self.activity_window = window;
        self
    }

    pub fn checks_activity(&self) -> bool {
        self.check_activity
    }

    /// Rules and score only. Returns the score of a surviving profile.
    pub fn screen(&self, profile: &RawProfile) -> Result<u8, Rejection> {
        if let Some(rule) = self.rules.first_rejection(profile) {
            return Err(Rejection::Rule(rule.to_string()));
        }
        let score = quality_score(profile);
        if score < self.min_score {
            return Err(Rejection::LowScore(score));
        }
        Ok(score)
    }

    /// Full decision, including the optional activity check.
    pub async fn evaluate<P>(&self, profile: RawProfile, activity: &P) -> Result<Verdict, P::Error>
    where
        P: ActivityCheck + ?Sized,
    {
        let score = match self.screen(&profile) {
            Ok(score) => score,
            Err(rejection) => {
                debug!(username = %profile.login, ?rejection, "Profile rejected");
                return Ok(Verdict::Rejected(rejection));
            }
        };

        if self.check_activity {
            let active = match activity.recent_repositories(&profile.login).await? {
                Some(repos) => has_recent_push(&repos, Utc::now(), self.activity_window),
                None => true,
            };
            if !active {
                debug!(username = %profile.login, "Profile rejected: no recent pushes");
                return Ok(Verdict::Rejected(Rejection::Inactive));
            }
        }

        Ok(Verdict::Accepted(CandidateProfile::from_raw(profile, score)))
    }

    /// `Some` when the profile is accepted.
    pub async fn accept<P>(
        &self,
        profile: RawProfile,
        activity: &P,
    ) -> Result<Option<CandidateProfile>, P::Error>
    where
        P: ActivityCheck + ?Sized,
    {
        Ok(match self.evaluate(profile, activity).await? {
            Verdict::Accepted(candidate) => Some(candidate),
            Verdict::Rejected(_) => None,
        })
    }
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::new()
    }
}
