//! Core domain types shared across the sourcing engine.
//!
//! The wire types (`RawProfile`, `RepoSummary`, `UserHit`, `Contributor`)
//! mirror the GitHub REST payloads closely enough to deserialize them
//! directly. `CandidateProfile` is the accepted, scored form that flows
//! through the agent pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a recruiting job. Progress events are routed by it.
pub type JobId = String;

/// GitHub login. Unique per account, compared case-insensitively.
pub type Username = String;

// =============================================================================
// Wire types
// =============================================================================

/// Account type as reported in the `type` field of user payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountKind {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

/// Full user profile from `GET /users/{login}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawProfile {
    pub login: Username,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub hireable: Option<bool>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RawProfile {
    /// Bio with surrounding whitespace removed, empty if absent.
    pub fn trimmed_bio(&self) -> &str {
        self.bio.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// One item of `GET /search/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHit {
    pub login: Username,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
}

/// Owner reference embedded in repository payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RepoOwner {
    pub login: Username,
}

/// Repository metadata from user repo listings and repository search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub owner: RepoOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: Username,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default)]
    pub contributions: u32,
}

/// A commit as listed by `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: String,
}

impl CommitSummary {
    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }
}

// =============================================================================
// Candidate types
// =============================================================================

/// A profile that passed every hard filter and scored high enough.
///
/// Only the quality filter constructs these; downstream stages take
/// ownership and never modify them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub username: Username,
    pub profile_url: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub hireable: bool,
    pub company: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    /// Heuristic reputation proxy in `0..=10`.
    pub quality_score: u8,
    pub created_at: Option<DateTime<Utc>>,
}

impl CandidateProfile {
    /// Build from a raw profile and its already computed score.
    pub fn from_raw(raw: RawProfile, quality_score: u8) -> Self {
        Self {
            profile_url: if raw.html_url.is_empty() {
                format!("https://github.com/{}", raw.login)
            } else {
                raw.html_url
            },
            username: raw.login,
            avatar_url: raw.avatar_url,
            bio: raw.bio,
            display_name: raw.name,
            location: raw.location,
            email: raw.email,
            hireable: raw.hireable.unwrap_or(false),
            company: raw.company,
            public_repos: raw.public_repos,
            followers: raw.followers,
            following: raw.following,
            quality_score,
            created_at: raw.created_at,
        }
    }

    /// Lowercased username used as the dedup key.
    pub fn dedup_key(&self) -> String {
        self.username.to_ascii_lowercase()
    }
}

/// Short description of a repository inside an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoHighlight {
    pub name: String,
    pub stars: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fit assessment produced by the scoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    /// Fit for the role in `0..=100`.
    pub fit_score: u8,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub top_repositories: Vec<RepoHighlight>,
}

/// Candidate plus its analysis, as emitted by the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedCandidate {
    pub profile: CandidateProfile,
    pub analysis: CandidateAnalysis,
}

// =============================================================================
// Job and keyword types
// =============================================================================

/// Seniority label returned by keyword extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeniorityLevel {
    Junior,
    MidLevel,
    Senior,
    Staff,
}

/// A job description the engine sources candidates for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub seniority_hint: Option<String>,
}

impl JobDescription {
    /// Location with blank values treated as absent.
    pub fn search_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Categorized search keywords for a job.
///
/// List lengths are capped; use [`KeywordBundle::normalized`] after
/// building one from an untrusted source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeywordBundle {
    #[serde(default)]
    pub core_languages: Vec<String>,
    #[serde(default)]
    pub primary_frameworks: Vec<String>,
    #[serde(default)]
    pub related_technologies: Vec<String>,
    #[serde(default)]
    pub repository_topics: Vec<String>,
    #[serde(default)]
    pub domain_keywords: Vec<String>,
    #[serde(default, rename = "seniority_level")]
    pub seniority: Option<SeniorityLevel>,
    #[serde(default)]
    pub alternative_terms: Vec<String>,
}

impl KeywordBundle {
    pub const MAX_LANGUAGES: usize = 3;
    pub const MAX_FRAMEWORKS: usize = 4;
    pub const MAX_RELATED: usize = 6;
    pub const MAX_TOPICS: usize = 5;
    pub const MAX_DOMAIN: usize = 4;
    pub const MAX_ALTERNATIVES: usize = 5;

    /// Trim entries, drop blanks and duplicates, and enforce list caps.
    pub fn normalized(mut self) -> Self {
        fn clean(list: &mut Vec<String>, cap: usize) {
            let mut seen = std::collections::HashSet::new();
            list.retain_mut(|entry| {
                *entry = entry.trim().to_string();
                !entry.is_empty() && seen.insert(entry.to_ascii_lowercase())
            });
            list.truncate(cap);
        }

        clean(&mut self.core_languages, Self::MAX_LANGUAGES);
        clean(&mut self.primary_frameworks, Self::MAX_FRAMEWORKS);
        clean(&mut self.related_technologies, Self::MAX_RELATED);
        clean(&mut self.repository_topics, Self::MAX_TOPICS);
        clean(&mut self.domain_keywords, Self::MAX_DOMAIN);
        clean(&mut self.alternative_terms, Self::MAX_ALTERNATIVES);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.core_languages.is_empty()
            && self.primary_frameworks.is_empty()
            && self.related_technologies.is_empty()
            && self.repository_topics.is_empty()
            && self.domain_keywords.is_empty()
            && self.alternative_terms.is_empty()
    }
}
