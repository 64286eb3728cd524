//! The FilterPipeline orchestrates the hard-reject rules.
//!
//! This module provides the FilterPipeline struct that chains filters
//! together using the builder pattern.

use crate::filters::{
    EmptyBioFilter, FollowAsymmetryFilter, IndividualAccountFilter, MinimumReposFilter,
    OrgMarkerFilter, TutorialAccountFilter,
};
use crate::traits::Filter;
use scout_model::RawProfile;

/// Ordered chain of hard-reject rules.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(IndividualAccountFilter)
///     .add_filter(MinimumReposFilter::new(3));
///
/// if let Some(rule) = pipeline.first_rejection(&profile) {
///     println!("rejected by {}", rule);
/// }
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The six standard rules, in order.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(IndividualAccountFilter)
            .add_filter(OrgMarkerFilter::default())
            .add_filter(TutorialAccountFilter::default())
            .add_filter(MinimumReposFilter::default())
            .add_filter(FollowAsymmetryFilter::default())
            .add_filter(EmptyBioFilter::default())
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Name of the first rule the profile fails, if any.
    ///
    /// Rules are evaluated in insertion order and evaluation stops at the
    /// first failure.
    pub fn first_rejection(&self, profile: &RawProfile) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| !f.passes(profile))
            .map(|f| f.name())
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
