//! # Scout Model Crate
//!
//! Domain types shared by every stage of the candidate-sourcing engine.
//!
//! ## Main Components
//!
//! - **types**: wire types for GitHub payloads, candidate types, jobs and keywords
//! - **job**: load job descriptions and previously-found candidate lists
//! - **error**: error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use scout_model::job::load_job;
//! use std::path::Path;
//!
//! let job = load_job(Path::new("jobs/backend.json"))?;
//! println!("Sourcing for {} ({:?})", job.title, job.search_location());
//! ```

pub mod error;
pub mod job;
pub mod types;

pub use error::{ModelError, Result};
pub use types::{
    // Type aliases
    JobId,
    Username,
    // Wire types
    AccountKind,
    CommitDetail,
    CommitSummary,
    Contributor,
    RawProfile,
    RepoOwner,
    RepoSummary,
    UserHit,
    // Candidate types
    AnalyzedCandidate,
    CandidateAnalysis,
    CandidateProfile,
    RepoHighlight,
    // Job types
    JobDescription,
    KeywordBundle,
    SeniorityLevel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_profile_deserializes_github_payload() {
        let payload = r#"{
            "login": "octocat",
            "html_url": "https://github.com/octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "type": "User",
            "name": "The Octocat",
            "bio": null,
            "public_repos": 8,
            "followers": 9000,
            "following": 9,
            "hireable": null,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;

        let profile: RawProfile = serde_json::from_str(payload).unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.kind, AccountKind::User);
        assert_eq!(profile.trimmed_bio(), "");
        assert!(profile.has_name());
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_unknown_account_kind() {
        let hit: UserHit = serde_json::from_str(r#"{"login": "x", "type": "Mannequin"}"#).unwrap();
        assert_eq!(hit.kind, AccountKind::Unknown);

        let org: UserHit =
            serde_json::from_str(r#"{"login": "y", "type": "Organization"}"#).unwrap();
        assert_eq!(org.kind, AccountKind::Organization);
    }

    #[test]
    fn test_candidate_from_raw() {
        let raw = RawProfile {
            login: "Alice".to_string(),
            hireable: Some(true),
            public_repos: 12,
            ..Default::default()
        };

        let candidate = CandidateProfile::from_raw(raw, 7);
        assert_eq!(candidate.username, "Alice");
        assert_eq!(candidate.profile_url, "https://github.com/Alice");
        assert!(candidate.hireable);
        assert_eq!(candidate.quality_score, 7);
        assert_eq!(candidate.dedup_key(), "alice");
    }

    #[test]
    fn test_keyword_bundle_normalized_caps_lists() {
        let bundle = KeywordBundle {
            core_languages: vec![
                "Rust".into(),
                " rust ".into(),
                "Go".into(),
                "".into(),
                "Python".into(),
                "Java".into(),
            ],
            repository_topics: (0..9).map(|i| format!("topic-{}", i)).collect(),
            ..Default::default()
        }
        .normalized();

        assert_eq!(bundle.core_languages, vec!["Rust", "Go", "Python"]);
        assert_eq!(bundle.repository_topics.len(), KeywordBundle::MAX_TOPICS);
        assert!(!bundle.is_empty());
        assert!(KeywordBundle::default().is_empty());
    }

    #[test]
    fn test_seniority_wire_format() {
        let bundle: KeywordBundle =
            serde_json::from_str(r#"{"core_languages": ["Go"], "seniority_level": "mid-level"}"#)
                .unwrap();
        assert_eq!(bundle.seniority, Some(SeniorityLevel::MidLevel));
    }

    #[test]
    fn test_commit_headline() {
        let commit = CommitSummary {
            sha: "abc".into(),
            commit: CommitDetail {
                message: "Fix parser\n\nLonger body".into(),
            },
        };
        assert_eq!(commit.headline(), "Fix parser");
    }
}
