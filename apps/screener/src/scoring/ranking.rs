//! Ranking: orders scored candidates, applies the minimum-score filter and
//! the top-N cut, then assigns 1-based ranks.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::CandidateProfile;
use crate::scoring::fit_scoring::ScoreBreakdown;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub profile: CandidateProfile,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub profile: CandidateProfile,
    pub breakdown: ScoreBreakdown,
}

/// Sorts by total score descending. Ties fall back to required-skill match,
/// then name, then email, so equal inputs always rank identically.
///
/// Candidates below `min_score` are dropped before the cut. `top_n` of zero,
/// a negative value or `None` keeps everyone.
pub fn rank(
    mut scored: Vec<ScoredCandidate>,
    min_score: Option<f64>,
    top_n: Option<i64>,
) -> Vec<RankedCandidate> {
    if let Some(min) = min_score {
        scored.retain(|c| c.breakdown.total_score >= min);
    }

    scored.sort_by(compare);

    let limit = match top_n {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => usize::MAX,
    };

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, c)| RankedCandidate {
            rank: i + 1,
            profile: c.profile,
            breakdown: c.breakdown,
        })
        .collect()
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.breakdown
        .total_score
        .total_cmp(&a.breakdown.total_score)
        .then_with(|| {
            b.breakdown
                .required_match_pct
                .total_cmp(&a.breakdown.required_match_pct)
        })
        .then_with(|| a.profile.name.cmp(&b.profile.name))
        .then_with(|| a.profile.email.cmp(&b.profile.email))
}
