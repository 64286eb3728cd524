//! Filter for personal-looking accounts that actually speak for a company.

use crate::traits::Filter;
use scout_model::RawProfile;

const DEFAULT_MARKERS: [&str; 4] = ["organization", "company", "official", "team"];

/// Rejects profiles whose bio or display name contains an organizational
/// marker (case-insensitive substring).
pub struct OrgMarkerFilter {
    markers: Vec<String>,
}

impl OrgMarkerFilter {
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.into().to_lowercase())
                .collect(),
        }
    }

    fn has_marker(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.markers.iter().any(|m| text.contains(m.as_str()))
    }
}

impl Default for OrgMarkerFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS)
    }
}

impl Filter for OrgMarkerFilter {
    fn name(&self) -> &str {
        "OrgMarkerFilter"
    }

    fn passes(&self, profile: &RawProfile) -> bool {
        let bio = profile.bio.as_deref().unwrap_or("");
        let name = profile.name.as_deref().unwrap_or("");
        !self.has_marker(bio) && !self.has_marker(name)
    }
}
