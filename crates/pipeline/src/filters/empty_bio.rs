//! Filter for profiles with no signal at all.
//!
//! Plenty of strong engineers never write a bio, so an empty bio is only
//! fatal when the profile has nothing else going for it.

use crate::traits::Filter;
use scout_model::RawProfile;

/// Rejects blank bios unless the profile has `min_repos` repositories or
/// `min_followers` followers.
pub struct EmptyBioFilter {
    min_repos: u32,
    min_followers: u32,
}

impl EmptyBioFilter {
    pub fn new(min_repos: u32, min_followers: u32) -> Self {
        Self {
            min_repos,
            min_followers,
        }
    }
}

impl Default for EmptyBioFilter {
    fn default() -> Self {
        Self::new(10, 50)
    }
}

impl Filter for EmptyBioFilter {
    fn name(&self) -> &str {
        "EmptyBioFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        !profile.trimmed_bio().is_empty()
            || profile.public_repos >= self.min_repos
            || profile.followers >= self.min_followers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::create_test_profile;

    #[test]
    fn test_empty_bio_filter() {
        let filter = EmptyBioFilter::default();
        let blank = |repos, followers| RawProfile {
            bio: Some("   ".into()),
            public_repos: repos,
            followers,
            ..create_test_profile("x")
        };

        assert!(!filter.passes(&blank(5, 10)));
        assert!(filter.passes(&blank(10, 0)));
        assert!(filter.passes(&blank(3, 50)));
        assert!(filter.passes(&create_test_profile("has-bio")));
    }
}
