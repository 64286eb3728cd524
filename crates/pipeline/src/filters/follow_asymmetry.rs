//! Filter for bot-like following patterns.

use crate::traits::Filter;
use scout_model::RawProfile;

/// Rejects profiles following more than `ratio` times as many accounts as
/// follow them, once they have more than `min_followers` followers.
///
/// Accounts at or below `min_followers` are left alone: new accounts
/// naturally follow more people than follow them.
pub struct FollowAsymmetryFilter {
    ratio: u32,
    min_followers: u32,
}

impl FollowAsymmetryFilter {
    pub fn new(ratio: u32, min_followers: u32) -> Self {
        Self {
            ratio,
            min_followers,
        }
    }
}

impl Default for FollowAsymmetryFilter {
    fn default() -> Self {
        Self::new(3, 10)
    }
}

impl Filter for FollowAsymmetryFilter {
    fn name(&self) -> &str {
        "FollowAsymmetryFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        let limit = u64::from(profile.followers) * u64::from(self.ratio);
        !(u64::from(profile.following) > limit && profile.followers > self.min_followers)
    }
}
