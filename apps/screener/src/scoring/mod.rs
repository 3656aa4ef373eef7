pub mod fit_scoring;
pub mod ranking;
pub mod weights;

pub use fit_scoring::{CandidateScorer, ScoreBreakdown, WeightedScorer};
pub use ranking::{rank, RankedCandidate, ScoredCandidate};
pub use weights::ScoringWeights;
