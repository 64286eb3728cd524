//! Core traits for the candidate filter chain.
//!
//! Hard-reject rules are small, pure predicates over a fetched profile so
//! that they can be composed in order and short-circuit on the first
//! rejection.

use scout_model::RawProfile;

/// A hard-reject rule.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across concurrent strategy tasks
/// - `passes` must not depend on anything but the profile, so acceptance is
///   reproducible
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the profile survives this rule.
    fn passes(&self, profile: &RawProfile) -> bool;
}
