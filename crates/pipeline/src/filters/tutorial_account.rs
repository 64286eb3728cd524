//! Filter for tutorial and bulk-fork accounts.
//!
//! Hundreds of repositories with almost no followers usually means course
//! exercises or mirrored forks, not original work.

use crate::traits::Filter;
use scout_model::RawProfile;

/// Rejects profiles with more than `max_repos` repositories and fewer than
/// `min_followers` followers.
pub struct TutorialAccountFilter {
    max_repos: u32,
    min_followers: u32,
}

impl TutorialAccountFilter {
    pub fn new(max_repos: u32, min_followers: u32) -> Self {
        Self {
            max_repos,
            min_followers,
        }
    }
}

impl Default for TutorialAccountFilter {
    fn default() -> Self {
        Self::new(100, 50)
    }
}

impl Filter for TutorialAccountFilter {
    fn name(&self) -> &str {
        "TutorialAccountFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        !(profile.public_repos > self.max_repos && profile.followers < self.min_followers)
    }
}
