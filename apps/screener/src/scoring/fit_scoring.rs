//! Fit Scoring: pluggable scorer that measures a candidate profile against a
//! job requirement.
//!
//! Default: `WeightedScorer` (pure, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn CandidateScorer>` so the HTTP surface and the
//! CLI pipeline share one scorer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extraction::tokens;
use crate::models::{CandidateProfile, JobRequirement};
use crate::scoring::weights::ScoringWeights;

/// Smallest requirement used as a divisor for the experience ratio.
const EXPERIENCE_EPSILON: f64 = 1e-9;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Per-candidate sub-scores and the weighted total, all in 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub required_match_pct: f64,
    pub preferred_match_pct: f64,
    pub keyword_match_pct: f64,
    pub experience_match_pct: f64,
    pub total_score: f64,
    /// Candidate skills that appear among required or preferred skills.
    pub matched_skills: BTreeSet<String>,
    /// Required skills the candidate lacks. Preferred gaps are not reported.
    pub missing_skills: BTreeSet<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The scorer trait. Implement this to swap scoring strategies without
/// touching the pipeline or the handlers.
pub trait CandidateScorer: Send + Sync {
    fn score(&self, job: &JobRequirement, candidate: &CandidateProfile) -> ScoreBreakdown;

    /// Short label for logs and reports.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Weighted sum of skill coverage, keyword overlap and experience ratio.
///
/// Algorithm:
/// 1. required/preferred = share of the JD's skills the candidate has
/// 2. keyword = share of JD keywords among the resume's tokens
/// 3. experience = candidate years / required years, capped at 1
/// 4. total = Σ(weight × sub-score)
///
/// An empty requirement set scores 100: nothing asked, nothing missing.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl CandidateScorer for WeightedScorer {
    fn score(&self, job: &JobRequirement, candidate: &CandidateProfile) -> ScoreBreakdown {
        compute_breakdown(job, candidate, &self.weights)
    }

    fn backend(&self) -> &'static str {
        "weighted"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_breakdown(
    job: &JobRequirement,
    candidate: &CandidateProfile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let required_hits = job.required_skills.intersection(&candidate.skills).count();
    let preferred_hits = job.preferred_skills.intersection(&candidate.skills).count();

    let resume_tokens = tokens::token_set(&candidate.raw_text);
    let keyword_hits = job.keywords.intersection(&resume_tokens).count();

    let required_match_pct = coverage(required_hits, job.required_skills.len());
    let preferred_match_pct = coverage(preferred_hits, job.preferred_skills.len());
    let keyword_match_pct = coverage(keyword_hits, job.keywords.len());
    let experience_match_pct =
        experience_match(candidate.experience_years, job.min_experience_years);

    let total_score = weights.combine(
        required_match_pct,
        preferred_match_pct,
        keyword_match_pct,
        experience_match_pct,
    );

    let matched_skills = candidate
        .skills
        .intersection(&job.all_skills())
        .cloned()
        .collect();
    let missing_skills = job
        .required_skills
        .difference(&candidate.skills)
        .cloned()
        .collect();

    ScoreBreakdown {
        required_match_pct,
        preferred_match_pct,
        keyword_match_pct,
        experience_match_pct,
        total_score,
        matched_skills,
        missing_skills,
    }
}

/// `100 * hits / total`, or 100 when there is nothing to cover.
fn coverage(hits: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (100.0 * hits as f64 / total as f64).clamp(0.0, 100.0)
}

/// Negative or non-finite inputs are treated as zero.
fn experience_match(candidate_years: f64, required_years: f64) -> f64 {
    let candidate_years = sanitize_years(candidate_years);
    let required_years = sanitize_years(required_years);
    if required_years == 0.0 {
        return 100.0;
    }
    100.0 * (candidate_years / required_years.max(EXPERIENCE_EPSILON)).min(1.0)
}

fn sanitize_years(years: f64) -> f64 {
    if years.is_finite() {
        years.max(0.0)
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
