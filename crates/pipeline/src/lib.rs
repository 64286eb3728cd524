//! Candidate filtering, scoring and deduplication.
//!
//! This crate provides:
//! - Filter trait and the hard-reject rules for fetched profiles
//! - FilterPipeline for composing rules in order
//! - The pure quality score
//! - QualityFilter, which combines rules, score and the activity check
//! - Deduplicator, the run-wide username set
//!
//! ## Architecture
//! Each search hit goes through:
//! 1. Deduplicator: skip usernames already seen (before any profile fetch)
//! 2. Rules: drop organizations, tutorial accounts, bot-like profiles
//! 3. Score: drop profiles scoring below 3
//! 4. Activity: drop profiles with no recent push (unknown passes, activity
//!    errors abort)
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Deduplicator, QualityFilter};
//!
//! let dedup = Deduplicator::seeded(already_found);
//! let filter = QualityFilter::new();
//!
//! if !dedup.is_seen(&hit.login) {
//!     if let Some(candidate) = filter.accept(profile, &activity).await? {
//!         if dedup.mark_accepted(&candidate.username) {
//!             accepted.push(candidate);
//!         }
//!     }
//! }
//! ```

pub mod activity;
pub mod dedup;
pub mod filter_pipeline;
pub mod filters;
pub mod quality;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use activity::{ActivityCheck, has_recent_push};
pub use dedup::Deduplicator;
pub use filter_pipeline::FilterPipeline;
pub use quality::{QualityFilter, Rejection, Verdict};
pub use scoring::{MAX_SCORE, MIN_ACCEPTED_SCORE, quality_score};
pub use traits::Filter;
