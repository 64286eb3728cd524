//! Local stand-ins for when the collaborator service is unavailable.
//!
//! ## Keyword fallback
//!
//! [`VocabularyExtractor`] scans the job text for known terms:
//!
//! 1. Lowercase title, description and requirements into one haystack
//! 2. Match each vocabulary entry (and its aliases) on word boundaries
//! 3. Derive seniority from title words, then from the seniority hint
//! 4. Default to `Python` when no language matched
//!
//! ## Scoring fallback
//!
//! [`fallback_analysis`] is a neutral assessment (fit 50) that flags the
//! candidate for manual review.

use crate::error::LlmError;
use crate::{CandidateScorer, KeywordExtractor, ScoringRequest};
use async_trait::async_trait;
use scout_model::{
    CandidateAnalysis, JobDescription, KeywordBundle, RepoHighlight, RepoSummary, SeniorityLevel,
};
use tracing::warn;

/// Neutral fit score used when no real analysis is available.
pub const NEUTRAL_FIT_SCORE: u8 = 50;

/// Language used when a job names none.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// `(canonical name, aliases)`. Aliases are matched too and recorded as
/// alternative terms.
type Vocabulary = &'static [(&'static str, &'static [&'static str])];

const LANGUAGES: Vocabulary = &[
    ("Python", &[]),
    ("TypeScript", &["ts"]),
    ("JavaScript", &["js"]),
    ("Go", &["golang"]),
    ("Rust", &[]),
    ("Java", &[]),
    ("Kotlin", &[]),
    ("Swift", &[]),
    ("C++", &["cpp"]),
    ("C#", &["csharp"]),
    ("Ruby", &[]),
    ("PHP", &[]),
    ("Scala", &[]),
    ("Elixir", &[]),
];

const FRAMEWORKS: Vocabulary = &[
    ("React", &["reactjs"]),
    ("Next.js", &["nextjs"]),
    ("Vue", &["vuejs"]),
    ("Angular", &[]),
    ("Django", &[]),
    ("Flask", &[]),
    ("FastAPI", &[]),
    ("Spring", &["spring boot"]),
    ("Rails", &["ruby on rails"]),
    ("Express", &["expressjs"]),
    ("Node.js", &["nodejs"]),
    ("PyTorch", &["torch"]),
    ("TensorFlow", &["tf"]),
    ("Kubernetes", &["k8s"]),
    ("Tokio", &[]),
];

const TECHNOLOGIES: Vocabulary = &[
    ("PostgreSQL", &["postgres"]),
    ("MySQL", &[]),
    ("MongoDB", &["mongo"]),
    ("Redis", &[]),
    ("Docker", &[]),
    ("AWS", &["amazon web services"]),
    ("GCP", &["google cloud"]),
    ("Azure", &[]),
    ("Kafka", &[]),
    ("GraphQL", &[]),
    ("Terraform", &[]),
    ("Elasticsearch", &[]),
];

/// `(trigger phrase, GitHub topic)`.
const TOPICS: &[(&str, &str)] = &[
    ("machine learning", "machine-learning"),
    ("ml", "machine-learning"),
    ("deep learning", "deep-learning"),
    ("nlp", "nlp"),
    ("computer vision", "computer-vision"),
    ("devops", "devops"),
    ("distributed systems", "distributed-systems"),
    ("data engineering", "data-engineering"),
    ("frontend", "frontend"),
    ("backend", "backend"),
    ("web", "web-development"),
    ("mobile", "mobile"),
    ("security", "security"),
    ("blockchain", "blockchain"),
];

const SENIORITY_WORDS: &[(&str, SeniorityLevel)] = &[
    ("junior", SeniorityLevel::Junior),
    ("jr", SeniorityLevel::Junior),
    ("intern", SeniorityLevel::Junior),
    ("graduate", SeniorityLevel::Junior),
    ("mid", SeniorityLevel::MidLevel),
    ("mid-level", SeniorityLevel::MidLevel),
    ("senior", SeniorityLevel::Senior),
    ("sr", SeniorityLevel::Senior),
    ("lead", SeniorityLevel::Senior),
    ("staff", SeniorityLevel::Staff),
    ("principal", SeniorityLevel::Staff),
];

/// True when `term` occurs in `haystack` not glued to other alphanumerics.
fn mentions(haystack: &str, term: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric();
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = haystack[..start].chars().next_back().is_none_or(|c| !is_word(c));
        let after_ok = haystack[end..].chars().next().is_none_or(|c| !is_word(c));
        before_ok && after_ok
    })
}

fn match_vocabulary(
    haystack: &str,
    vocab: Vocabulary,
    alternatives: &mut Vec<String>,
) -> Vec<String> {
    let mut found = Vec::new();
    for (name, aliases) in vocab {
        let direct = mentions(haystack, &name.to_lowercase());
        let alias = aliases.iter().find(|a| mentions(haystack, a));
        if let Some(alias) = alias {
            alternatives.push(alias.to_string());
        }
        if direct || alias.is_some() {
            found.push(name.to_string());
        }
    }
    found
}

fn seniority_from_words(text: &str) -> Option<SeniorityLevel> {
    let lower = text.to_lowercase();
    SENIORITY_WORDS
        .iter()
        .filter(|(word, _)| mentions(&lower, word))
        .map(|(_, level)| *level)
        .max_by_key(|level| match level {
            SeniorityLevel::Junior => 0,
            SeniorityLevel::MidLevel => 1,
            SeniorityLevel::Senior => 2,
            SeniorityLevel::Staff => 3,
        })
}

/// Title with seniority words removed, as a bio phrase ("backend engineer").
fn role_phrase(title: &str) -> Option<String> {
    let words: Vec<&str> = title
        .split_whitespace()
        .filter(|w| {
            let lower = w.to_lowercase();
            !SENIORITY_WORDS.iter().any(|(s, _)| *s == lower)
        })
        .collect();
    (!words.is_empty()).then(|| words.join(" ").to_lowercase())
}

/// Build a keyword bundle from the job text alone. Never fails.
pub fn fallback_keywords(job: &JobDescription) -> KeywordBundle {
    let haystack = format!(
        "{} {} {}",
        job.title,
        job.description,
        job.requirements.join(" ")
    )
    .to_lowercase();

    let mut alternative_terms = Vec::new();
    let mut core_languages = match_vocabulary(&haystack, LANGUAGES, &mut alternative_terms);
    if core_languages.is_empty() {
        core_languages.push(DEFAULT_LANGUAGE.to_string());
    }
    let primary_frameworks = match_vocabulary(&haystack, FRAMEWORKS, &mut alternative_terms);
    let related_technologies = match_vocabulary(&haystack, TECHNOLOGIES, &mut alternative_terms);
    let repository_topics = TOPICS
        .iter()
        .filter(|(trigger, _)| mentions(&haystack, trigger))
        .map(|(_, topic)| topic.to_string())
        .collect();

    let seniority = seniority_from_words(&job.title).or_else(|| {
        job.seniority_hint
            .as_deref()
            .and_then(seniority_from_words)
    });

    KeywordBundle {
        core_languages,
        primary_frameworks,
        related_technologies,
        repository_topics,
        domain_keywords: role_phrase(&job.title).into_iter().collect(),
        seniority,
        alternative_terms,
    }
    .normalized()
}

/// Neutral analysis listing the three most starred repositories.
pub fn fallback_analysis(repositories: &[RepoSummary]) -> CandidateAnalysis {
    let mut top: Vec<&RepoSummary> = repositories.iter().collect();
    top.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    CandidateAnalysis {
        fit_score: NEUTRAL_FIT_SCORE,
        skills: vec!["GitHub contributor".to_string()],
        strengths: vec!["Active on GitHub".to_string()],
        concerns: vec!["Analysis failed - manual review needed".to_string()],
        top_repositories: top
            .into_iter()
            .take(3)
            .map(|r| RepoHighlight {
                name: r.name.clone(),
                stars: r.stargazers_count,
                description: r.description.clone(),
            })
            .collect(),
    }
}

/// Keyword extractor that only uses the local vocabulary.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocabularyExtractor;

#[async_trait]
impl KeywordExtractor for VocabularyExtractor {
    async fn extract_keywords(&self, job: &JobDescription) -> Result<KeywordBundle, LlmError> {
        Ok(fallback_keywords(job))
    }
}

/// Scorer that always returns the neutral analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralScorer;

#[async_trait]
impl CandidateScorer for NeutralScorer {
    async fn score_candidate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CandidateAnalysis, LlmError> {
        Ok(fallback_analysis(&request.repositories))
    }
}

/// Ask the extractor, falling back to the local vocabulary on any error.
pub async fn extract_or_fallback(
    extractor: &dyn KeywordExtractor,
    job: &JobDescription,
) -> KeywordBundle {
    match extractor.extract_keywords(job).await {
        Ok(bundle) => bundle,
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "Keyword extraction failed, using vocabulary fallback");
            fallback_keywords(job)
        }
    }
}

/// Ask the scorer, falling back to the neutral analysis on any error.
pub async fn score_or_fallback(
    scorer: &dyn CandidateScorer,
    request: &ScoringRequest,
) -> CandidateAnalysis {
    match scorer.score_candidate(request).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(username = %request.profile.username, error = %e, "Scoring failed, using neutral analysis");
            fallback_analysis(&request.repositories)
        }
    }
}
