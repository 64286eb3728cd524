//! Filter that keeps personal accounts only.

use crate::traits::Filter;
use scout_model::{AccountKind, RawProfile};

/// Rejects organizations, bots and any account type GitHub adds later.
pub struct IndividualAccountFilter;

impl Filter for IndividualAccountFilter {
    fn name(&self) -> &str {
        "IndividualAccountFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        profile.kind == AccountKind::User
    }
}
