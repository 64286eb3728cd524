//! Hard-reject rules for fetched profiles.
//!
//! [`FilterPipeline::standard`](crate::FilterPipeline::standard) composes
//! them in this order:
//!
//! 1. [`IndividualAccountFilter`]: organizations and other non-user accounts
//! 2. [`OrgMarkerFilter`]: bios or names that read like a company
//! 3. [`TutorialAccountFilter`]: bulk repositories with little following
//! 4. [`MinimumReposFilter`]: too little public work
//! 5. [`FollowAsymmetryFilter`]: follow-for-follow patterns
//! 6. [`EmptyBioFilter`]: no bio and no other signal

pub mod empty_bio;
pub mod follow_asymmetry;
pub mod individual_account;
pub mod minimum_repos;
pub mod org_marker;
pub mod tutorial_account;

// Re-export for convenience
pub use empty_bio::EmptyBioFilter;
pub use follow_asymmetry::FollowAsymmetryFilter;
pub use individual_account::IndividualAccountFilter;
pub use minimum_repos::MinimumReposFilter;
pub use org_marker::OrgMarkerFilter;
pub use tutorial_account::TutorialAccountFilter;

#[cfg(test)]
pub(crate) fn create_test_profile(login: &str) -> scout_model::RawProfile {
    scout_model::RawProfile {
        login: login.to_string(),
        bio: Some("Systems programmer working on databases".to_string()),
        public_repos: 12,
        followers: 30,
        following: 20,
        ..Default::default()
    }
}
