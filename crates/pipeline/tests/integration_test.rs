//! Integration tests for the pipeline.
//!
//! These tests run deduplication, the rule chain, scoring and the activity
//! check together over a realistic set of search hits.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use pipeline::{ActivityCheck, Deduplicator, QualityFilter};
use scout_model::{AccountKind, CandidateProfile, RawProfile, RepoSummary};
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

/// Activity answering from a fixed map of username -> days since last push.
struct MapActivity {
    last_push_days: HashMap<String, i64>,
}

#[async_trait]
impl ActivityCheck for MapActivity {
    type Error = Infallible;

    async fn recent_repositories(
        &self,
        username: &str,
    ) -> Result<Option<Vec<RepoSummary>>, Infallible> {
        Ok(self.last_push_days.get(username).map(|days| {
            vec![RepoSummary {
                name: format!("{}-project", username),
                pushed_at: Some(Utc::now() - Duration::days(*days)),
                ..Default::default()
            }]
        }))
    }
}

fn create_test_setup() -> (Vec<RawProfile>, MapActivity) {
    let person = |login: &str, repos: u32, followers: u32| RawProfile {
        login: login.to_string(),
        name: Some(login.to_uppercase()),
        bio: Some("Backend engineer, Rust and Postgres enthusiast".to_string()),
        location: Some("Lisbon".to_string()),
        public_repos: repos,
        followers,
        following: 10,
        ..Default::default()
    };

    let profiles = vec![
        person("alice", 25, 120),
        person("bob", 8, 30),
        // Same account found by a second strategy.
        person("Alice", 25, 120),
        // Seeded from an earlier run.
        person("carol", 30, 200),
        // Tutorial account.
        person("mirror-bot", 150, 10),
        // Organization.
        RawProfile {
            kind: AccountKind::Organization,
            ..person("acme", 40, 500)
        },
        // Dormant.
        person("dave", 15, 60),
        // Activity unknown.
        person("erin", 12, 26),
    ];

    let activity = MapActivity {
        last_push_days: [("alice", 3), ("Alice", 3), ("bob", 20), ("carol", 1), ("dave", 365)]
            .into_iter()
            .map(|(u, d)| (u.to_string(), d))
            .collect(),
    };

    (profiles, activity)
}

async fn run(
    profiles: Vec<RawProfile>,
    dedup: &Deduplicator,
    filter: &QualityFilter,
    activity: &MapActivity,
) -> Vec<CandidateProfile> {
    let mut accepted = Vec::new();
    for profile in profiles {
        if dedup.is_seen(&profile.login) {
            continue;
        }
        let Ok(accepted_profile) = filter.accept(profile, activity).await;
        if let Some(candidate) = accepted_profile {
            if dedup.mark_accepted(&candidate.username) {
                accepted.push(candidate);
            }
        }
    }
    accepted
}

#[tokio::test]
async fn test_full_screening() {
    let (profiles, activity) = create_test_setup();
    let dedup = Deduplicator::seeded(["carol"]);
    let filter = QualityFilter::new();

    let accepted = run(profiles, &dedup, &filter, &activity).await;
    let names: Vec<&str> = accepted.iter().map(|c| c.username.as_str()).collect();

    assert_eq!(names, vec!["alice", "bob", "erin"]);
}

#[tokio::test]
async fn test_no_duplicates_and_seeds_excluded() {
    let (profiles, activity) = create_test_setup();
    let dedup = Deduplicator::seeded(["carol"]);
    let filter = QualityFilter::new().with_activity_check(false);

    let accepted = run(profiles, &dedup, &filter, &activity).await;

    let unique: HashSet<String> = accepted.iter().map(|c| c.dedup_key()).collect();
    assert_eq!(unique.len(), accepted.len());
    assert!(!unique.contains("carol"));
    // Without the activity check the dormant account gets through.
    assert!(unique.contains("dave"));
}

#[tokio::test]
async fn test_accepted_scores_in_range() {
    let (profiles, activity) = create_test_setup();
    let dedup = Deduplicator::new();
    let filter = QualityFilter::new();

    for candidate in run(profiles, &dedup, &filter, &activity).await {
        assert!(
            (3..=10).contains(&candidate.quality_score),
            "{} scored {}",
            candidate.username,
            candidate.quality_score
        );
    }
}
