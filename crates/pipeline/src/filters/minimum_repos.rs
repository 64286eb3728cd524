//! Filter to ensure enough public work to judge.

use crate::traits::Filter;
use scout_model::RawProfile;

/// Rejects profiles with fewer than `min_repos` public repositories.
pub struct MinimumReposFilter {
    min_repos: u32,
}

impl MinimumReposFilter {
    pub fn new(min_repos: u32) -> Self {
        Self { min_repos }
    }
}

impl Default for MinimumReposFilter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Filter for MinimumReposFilter {
    fn name(&self) -> &str {
        "MinimumReposFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        profile.public_repos >= self.min_repos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::create_test_profile;

    #[test]
    fn test_minimum_repos_filter() {
        let filter = MinimumReposFilter::default();
        let with = |repos| RawProfile {
            public_repos: repos,
            ..create_test_profile("x")
        };

        assert!(!filter.passes(&with(0)));
        assert!(!filter.passes(&with(2)));
        assert!(filter.passes(&with(3)));
    }
}
