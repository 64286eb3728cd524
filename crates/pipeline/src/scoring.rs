//! Heuristic quality score for a profile.
//!
//! ## Algorithm
//!
//! | Signal                                   | Points   |
//! |------------------------------------------|----------|
//! | public repos ≥20 / ≥10 / ≥5              | 3 / 2 / 1 |
//! | trimmed bio length ≥50 / ≥20 chars       | 2 / 1    |
//! | display name present                     | 1        |
//! | location, email or company present       | 1        |
//! | followers ≥100 / ≥25                     | 2 / 1    |
//! | marked hireable                          | 1        |
//! | follower/following ratio in [0.3, 10]    | 1        |
//!
//! The sum is capped at [`MAX_SCORE`]. The score depends on nothing but the
//! profile fields.

use scout_model::RawProfile;

pub const MAX_SCORE: u8 = 10;

/// Accepted candidates score at least this much.
pub const MIN_ACCEPTED_SCORE: u8 = 3;

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Compute the 0..=10 quality score.
pub fn quality_score(profile: &RawProfile) -> u8 {
    let mut score: u8 = 0;

    score += match profile.public_repos {
        r if r >= 20 => 3,
        r if r >= 10 => 2,
        r if r >= 5 => 1,
        _ => 0,
    };

    score += match profile.trimmed_bio().chars().count() {
        n if n >= 50 => 2,
        n if n >= 20 => 1,
        _ => 0,
    };

    if profile.has_name() {
        score += 1;
    }

    if present(&profile.location) || present(&profile.email) || present(&profile.company) {
        score += 1;
    }

    score += match profile.followers {
        f if f >= 100 => 2,
        f if f >= 25 => 1,
        _ => 0,
    };

    if profile.hireable == Some(true) {
        score += 1;
    }

    if profile.followers > 0 && profile.following > 0 {
        let ratio = f64::from(profile.followers) / f64::from(profile.following);
        if (0.3..=10.0).contains(&ratio) {
            score += 1;
        }
    }

    score.min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_boundary_profile() -> RawProfile {
        RawProfile {
            login: "boundary".into(),
            name: Some("Boundary Case".into()),
            bio: Some("x".repeat(60)),
            location: Some("Berlin".into()),
            public_repos: 20,
            followers: 150,
            following: 30,
            hireable: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_boundary_profile_is_capped() {
        // 3 + 2 + 1 + 1 + 2 + 1 + 1 = 11, capped.
        assert_eq!(quality_score(&create_boundary_profile()), MAX_SCORE);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        assert_eq!(quality_score(&RawProfile::default()), 0);
    }

    #[test]
    fn test_score_is_reproducible() {
        let profile = create_boundary_profile();
        let scores: Vec<u8> = (0..5).map(|_| quality_score(&profile)).collect();
        assert!(scores.iter().all(|s| *s == scores[0]));
    }

    #[test]
    fn test_individual_signals() {
        let base = RawProfile {
            public_repos: 5,
            ..Default::default()
        };
        assert_eq!(quality_score(&base), 1);

        let with_bio = RawProfile {
            bio: Some(format!("  {}  ", "a".repeat(20))),
            ..base.clone()
        };
        assert_eq!(quality_score(&with_bio), 2);

        let with_company_only = RawProfile {
            company: Some("Initech".into()),
            ..base.clone()
        };
        assert_eq!(quality_score(&with_company_only), 2);

        // Blank strings are not "present".
        let blank_location = RawProfile {
            location: Some("  ".into()),
            ..base.clone()
        };
        assert_eq!(quality_score(&blank_location), 1);

        // hireable: None does not count.
        let unknown_hireable = RawProfile {
            hireable: None,
            ..base
        };
        assert_eq!(quality_score(&unknown_hireable), 1);
    }

    #[test]
    fn test_ratio_bonus_bounds() {
        let with = |followers, following| RawProfile {
            followers,
            following,
            ..Default::default()
        };

        assert_eq!(quality_score(&with(3, 10)), 1); // 0.3
        assert_eq!(quality_score(&with(2, 10)), 0); // 0.2
        assert_eq!(quality_score(&with(20, 2)), 1); // 10.0
        assert_eq!(quality_score(&with(21, 2)), 0); // 10.5
        assert_eq!(quality_score(&with(5, 0)), 0);
    }

    #[test]
    fn test_score_never_exceeds_max() {
        for repos in [0, 5, 10, 20, 500] {
            for followers in [0, 25, 100, 10_000] {
                let profile = RawProfile {
                    public_repos: repos,
                    followers,
                    following: followers / 2 + 1,
                    hireable: Some(true),
                    name: Some("n".into()),
                    email: Some("e@x.io".into()),
                    bio: Some("b".repeat(80)),
                    ..Default::default()
                };
                assert!(quality_score(&profile) <= MAX_SCORE);
            }
        }
    }
}
