//! # Sources Crate
//!
//! This crate turns a job's keywords into GitHub searches and runs them.
//!
//! ## Components
//!
//! ### Strategy Builder
//! Deterministic (given a seed) generation of search strategies:
//! - User searches matching topics, frameworks, domain phrases and
//!   technology pairs in bios
//! - Contributor lists of popular repositories for a language and topic
//! - Page offset derived from how many candidates were already found, so
//!   follow-up runs surface new people
//!
//! ### GitHub Searcher
//! Executes one strategy: collects logins, skips already seen ones, fetches
//! profiles and runs them through the quality filter.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{StrategyBuilder, GitHubSearcher, StrategyRunner, build_search_context};
//! use std::sync::Arc;
//!
//! let context = build_search_context(&job, keywords, seen.len());
//! let strategies = StrategyBuilder::new().build(&context);
//!
//! let searcher = GitHubSearcher::new(client, Arc::new(QualityFilter::new()), dedup);
//! for strategy in &strategies {
//!     let accepted = searcher.run_strategy(strategy).await?;
//!     println!("{}: {} candidates", strategy.name, accepted.len());
//! }
//! ```

// Public modules
pub mod context;
pub mod query;
pub mod searcher;
pub mod strategy;
pub mod types;

// Re-export main types
pub use context::{SearchContext, build_search_context};
pub use query::SearchQuery;
pub use searcher::{GitHubActivityCheck, GitHubSearcher, StrategyError, StrategyRunner};
pub use strategy::{MAX_SEARCH_PAGE, StrategyBuilder, page_for};
pub use types::{SearchOutcome, SearchResult, SearchStrategy, StrategyKind};
