//! Strategy Builder - Query Generation
//!
//! Turns a job's keyword bundle into an ordered list of GitHub searches.
//!
//! ## Algorithm
//! 1. Shuffle every keyword category independently, so repeated runs do not
//!    always try the same sub-slice first
//! 2. Pick the result page from the number of candidates already found:
//!    `1 + seen / page_size`, capped at page 10
//! 3. Generate strategies from fixed templates, a few per template:
//!    - topic in bio, for recently active accounts
//!    - framework in bio plus repository language
//!    - domain phrase in bio
//!    - two related technologies in bio
//!    - alternative technology name in bio
//!    - contributors of popular repositories for a language and topic
//! 4. Append the job location to user searches
//!
//! Every template carries an activity floor (repository count, followers,
//! or account age) to favour real, individual, moderately active accounts.

use crate::context::SearchContext;
use crate::query::SearchQuery;
use crate::types::{SearchStrategy, StrategyKind};
use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// GitHub search serves at most 1000 results, i.e. 10 pages of 100.
pub const MAX_SEARCH_PAGE: u32 = 10;

/// Accounts must be older than this.
const ACCOUNT_AGE_DAYS: i64 = 365;

/// Popular repositories must have been pushed within this window.
const PUSH_WINDOW_DAYS: i64 = 182;

const TOPIC_STRATEGIES: usize = 3;
const FRAMEWORK_STRATEGIES: usize = 3;
const DOMAIN_STRATEGIES: usize = 2;
const TECH_STACK_STRATEGIES: usize = 2;
const ALTERNATIVE_STRATEGIES: usize = 2;
const REPOSITORY_STRATEGIES: usize = 2;

/// Result page for a strategy, given how many candidates were already found.
pub fn page_for(seen_count: usize, page_size: u32) -> u32 {
    let page_size = page_size.max(1) as usize;
    let page = 1 + seen_count / page_size;
    page.min(MAX_SEARCH_PAGE as usize) as u32
}

fn topic_slug(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn date_qualifier(op: char, date: NaiveDate) -> String {
    format!("{}{}", op, date.format("%Y-%m-%d"))
}

/// Generates search strategies from a [`SearchContext`].
#[derive(Debug, Clone)]
pub struct StrategyBuilder {
    seed: Option<u64>,
    repositories_per_strategy: u32,
}

impl StrategyBuilder {
    pub fn new() -> Self {
        Self {
            seed: None,
            repositories_per_strategy: 3,
        }
    }

    /// Fix the shuffle seed (default: random per build)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configure how many popular repositories a contributor strategy
    /// inspects (default: 3)
    pub fn with_repositories_per_strategy(mut self, count: u32) -> Self {
        self.repositories_per_strategy = count.max(1);
        self
    }

    #[instrument(skip(self, context), fields(seen = context.seen_count))]
    pub fn build(&self, context: &SearchContext) -> Vec<SearchStrategy> {
        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or_else(rand::random));
        let mut keywords = context.keywords.clone();
        keywords.core_languages.shuffle(&mut rng);
        keywords.primary_frameworks.shuffle(&mut rng);
        keywords.related_technologies.shuffle(&mut rng);
        keywords.repository_topics.shuffle(&mut rng);
        keywords.domain_keywords.shuffle(&mut rng);
        keywords.alternative_terms.shuffle(&mut rng);

        let templates = Templates {
            context,
            languages: &keywords.core_languages,
            created_before: date_qualifier('<', context.today - Duration::days(ACCOUNT_AGE_DAYS)),
            pushed_after: date_qualifier('>', context.today - Duration::days(PUSH_WINDOW_DAYS)),
        };

        let mut strategies = Vec::new();
        strategies.extend(templates.topic_in_bio(&keywords.repository_topics));
        strategies.extend(templates.framework_language(&keywords.primary_frameworks));
        strategies.extend(templates.domain_in_bio(&keywords.domain_keywords));
        strategies.extend(templates.tech_stack(&keywords.related_technologies));
        strategies.extend(templates.alternative_terms(&keywords.alternative_terms));
        strategies.extend(templates.repository_contributors(
            &keywords.repository_topics,
            self.repositories_per_strategy,
        ));

        debug!("Generated {} strategies", strategies.len());
        strategies
    }
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Template helpers sharing the per-build inputs.
struct Templates<'a> {
    context: &'a SearchContext,
    languages: &'a [String],
    created_before: String,
    pushed_after: String,
}

impl Templates<'_> {
    fn user_search(
        &self,
        name: String,
        description: String,
        query: SearchQuery,
        page_size: u32,
    ) -> SearchStrategy {
        let query = query.qualifier_opt("location", self.context.location.as_deref());
        SearchStrategy {
            name,
            description,
            query: query.build(),
            page: page_for(self.context.seen_count, page_size),
            page_size,
            kind: StrategyKind::UserSearch,
        }
    }

    fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    fn topic_in_bio(&self, topics: &[String]) -> Vec<SearchStrategy> {
        topics
            .iter()
            .take(TOPIC_STRATEGIES)
            .map(|topic| {
                let slug = topic_slug(topic);
                let query = SearchQuery::new()
                    .term(&slug)
                    .qualifier("in", "bio")
                    .qualifier("type", "user")
                    .qualifier("repos", ">3")
                    .qualifier("created", &self.created_before)
                    .qualifier("followers", ">5");
                self.user_search(
                    format!("topic-bio:{}", slug),
                    format!("Active accounts mentioning '{}' in their bio", topic),
                    query,
                    15,
                )
            })
            .collect()
    }

    fn framework_language(&self, frameworks: &[String]) -> Vec<SearchStrategy> {
        frameworks
            .iter()
            .take(2)
            .flat_map(|fw| self.languages.iter().take(2).map(move |lang| (fw, lang)))
            .take(FRAMEWORK_STRATEGIES)
            .map(|(fw, lang)| {
                let query = SearchQuery::new()
                    .term(fw)
                    .qualifier("in", "bio")
                    .qualifier("language", lang)
                    .qualifier("type", "user")
                    .qualifier("repos", ">5")
                    .qualifier("followers", ">3");
                self.user_search(
                    format!("framework-language:{}+{}", fw, lang),
                    format!("{} users writing {}", fw, lang),
                    query,
                    10,
                )
            })
            .collect()
    }

    fn domain_in_bio(&self, phrases: &[String]) -> Vec<SearchStrategy> {
        phrases
            .iter()
            .take(DOMAIN_STRATEGIES)
            .map(|phrase| {
                let query = SearchQuery::new()
                    .term(phrase)
                    .qualifier("in", "bio")
                    .qualifier("type", "user")
                    .qualifier("repos", ">5")
                    .qualifier("created", &self.created_before)
                    .qualifier_opt("language", self.primary_language());
                self.user_search(
                    format!("domain-bio:{}", phrase),
                    format!("Self-described '{}'", phrase),
                    query,
                    12,
                )
            })
            .collect()
    }

    fn tech_stack(&self, technologies: &[String]) -> Vec<SearchStrategy> {
        technologies
            .chunks_exact(2)
            .take(TECH_STACK_STRATEGIES)
            .map(|pair| {
                let query = SearchQuery::new()
                    .term(&pair[0])
                    .term(&pair[1])
                    .qualifier("in", "bio")
                    .qualifier("type", "user")
                    .qualifier("repos", ">7");
                self.user_search(
                    format!("tech-stack:{}+{}", pair[0], pair[1]),
                    format!("Experienced with both {} and {}", pair[0], pair[1]),
                    query,
                    10,
                )
            })
            .collect()
    }

    fn alternative_terms(&self, terms: &[String]) -> Vec<SearchStrategy> {
        terms
            .iter()
            .take(ALTERNATIVE_STRATEGIES)
            .map(|term| {
                let query = SearchQuery::new()
                    .term(term)
                    .qualifier("in", "bio")
                    .qualifier("type", "user")
                    .qualifier("repos", ">5")
                    .qualifier_opt("language", self.primary_language());
                self.user_search(
                    format!("alt-term:{}", term),
                    format!("Bios using the alternative term '{}'", term),
                    query,
                    8,
                )
            })
            .collect()
    }

    /// Repository search has no location qualifier, so none is added.
    fn repository_contributors(
        &self,
        topics: &[String],
        max_repositories: u32,
    ) -> Vec<SearchStrategy> {
        self.languages
            .iter()
            .take(REPOSITORY_STRATEGIES)
            .enumerate()
            .map(|(i, lang)| {
                let topic = topics.get(i).or_else(|| topics.first()).map(|t| topic_slug(t));
                let query = SearchQuery::new()
                    .qualifier("language", lang)
                    .qualifier_opt("topic", topic.as_deref())
                    .qualifier("stars", ">100")
                    .qualifier("pushed", &self.pushed_after);
                let label = match &topic {
                    Some(t) => format!("{}/{}", lang, t),
                    None => lang.clone(),
                };
                SearchStrategy {
                    name: format!("repo-contributors:{}", label),
                    description: format!("Contributors to popular {} repositories", label),
                    query: query.build(),
                    page: page_for(self.context.seen_count, max_repositories),
                    page_size: max_repositories,
                    kind: StrategyKind::RepositoryContributors { max_repositories },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_model::KeywordBundle;

    fn create_test_bundle() -> KeywordBundle {
        KeywordBundle {
            core_languages: vec!["Python".into(), "Go".into()],
            primary_frameworks: vec!["Django".into(), "FastAPI".into()],
            related_technologies: vec![
                "PostgreSQL".into(),
                "Redis".into(),
                "Docker".into(),
                "AWS".into(),
            ],
            repository_topics: vec!["machine learning".into(), "mlops".into()],
            domain_keywords: vec!["ml engineer".into()],
            seniority: None,
            alternative_terms: vec!["k8s".into()],
        }
    }

    fn create_test_context() -> SearchContext {
        SearchContext::new(create_test_bundle())
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    fn count_with_prefix(strategies: &[SearchStrategy], prefix: &str) -> usize {
        strategies
            .iter()
            .filter(|s| s.name.starts_with(prefix))
            .count()
    }

    #[test]
    fn test_every_template_contributes() {
        let strategies = StrategyBuilder::new().with_seed(7).build(&create_test_context());

        assert_eq!(count_with_prefix(&strategies, "topic-bio:"), 2);
        assert_eq!(count_with_prefix(&strategies, "framework-language:"), 3);
        assert_eq!(count_with_prefix(&strategies, "domain-bio:"), 1);
        assert_eq!(count_with_prefix(&strategies, "tech-stack:"), 2);
        assert_eq!(count_with_prefix(&strategies, "alt-term:"), 1);
        assert_eq!(count_with_prefix(&strategies, "repo-contributors:"), 2);
    }

    #[test]
    fn test_same_seed_same_strategies() {
        let context = create_test_context();
        let a = StrategyBuilder::new().with_seed(42).build(&context);
        let b = StrategyBuilder::new().with_seed(42).build(&context);
        assert_eq!(a, b);
    }

    #[test]
    fn test_date_qualifiers_are_anchored() {
        let strategies = StrategyBuilder::new().with_seed(1).build(&create_test_context());

        let topic = strategies
            .iter()
            .find(|s| s.name.starts_with("topic-bio:"))
            .unwrap();
        assert!(topic.query.contains("created:<2025-10-15"));
        assert!(topic.query.contains("followers:>5"));

        let repo = strategies
            .iter()
            .find(|s| s.name.starts_with("repo-contributors:"))
            .unwrap();
        assert!(repo.query.contains("pushed:>2026-04-16"));
        assert!(repo.query.contains("stars:>100"));
    }

    #[test]
    fn test_multi_word_values_are_quoted() {
        let strategies = StrategyBuilder::new().with_seed(3).build(&create_test_context());

        let domain = strategies
            .iter()
            .find(|s| s.name.starts_with("domain-bio:"))
            .unwrap();
        assert!(domain.query.starts_with("\"ml engineer\" in:bio"));

        // Topics become hyphenated slugs instead.
        assert!(strategies.iter().any(|s| s.name == "topic-bio:machine-learning"));
    }

    #[test]
    fn test_location_only_on_user_searches() {
        let context = create_test_context().with_location(Some("San Francisco"));
        let strategies = StrategyBuilder::new().with_seed(5).build(&context);

        for strategy in &strategies {
            if strategy.is_user_search() {
                assert!(
                    strategy.query.ends_with("location:\"San Francisco\""),
                    "{}",
                    strategy.query
                );
            } else {
                assert!(!strategy.query.contains("location:"));
            }
        }
    }

    #[test]
    fn test_page_offset_from_seen_count() {
        assert_eq!(page_for(0, 15), 1);
        assert_eq!(page_for(14, 15), 1);
        assert_eq!(page_for(30, 15), 3);
        assert_eq!(page_for(10_000, 10), MAX_SEARCH_PAGE);

        let context = create_test_context().with_seen_count(24);
        let strategies = StrategyBuilder::new().with_seed(9).build(&context);
        let alt = strategies
            .iter()
            .find(|s| s.name.starts_with("alt-term:"))
            .unwrap();
        assert_eq!(alt.page_size, 8);
        assert_eq!(alt.page, 4);
    }

    #[test]
    fn test_empty_bundle_yields_no_strategies() {
        let context = SearchContext::new(KeywordBundle::default());
        assert!(StrategyBuilder::new().build(&context).is_empty());
    }

    #[test]
    fn test_language_only_repository_strategy() {
        let context = SearchContext::new(KeywordBundle {
            core_languages: vec!["Rust".into()],
            ..Default::default()
        });
        let strategies = StrategyBuilder::new().with_seed(0).build(&context);

        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].name, "repo-contributors:Rust");
        assert!(strategies[0].query.starts_with("language:Rust stars:>100 pushed:>"));
        assert_eq!(
            strategies[0].kind,
            StrategyKind::RepositoryContributors { max_repositories: 3 }
        );
    }
}
