use serde::{Deserialize, Serialize};

use crate::errors::ScreenError;

/// Allowed drift when checking that the weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative importance of each sub-score in the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    pub required_skills: f64,
    pub preferred_skills: f64,
    pub keyword_match: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            required_skills: 0.40,
            preferred_skills: 0.20,
            keyword_match: 0.15,
            experience: 0.25,
        }
    }
}

impl ScoringWeights {
    /// Weights must be finite, non-negative and sum to one.
    pub fn validate(&self) -> Result<(), ScreenError> {
        let all = [
            ("required_skills", self.required_skills),
            ("preferred_skills", self.preferred_skills),
            ("keyword_match", self.keyword_match),
            ("experience", self.experience),
        ];
        if let Some((name, value)) = all.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ScreenError::Config(format!(
                "weight '{name}' must be a non-negative number, got {value}"
            )));
        }
        let sum: f64 = all.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScreenError::Config(format!(
                "scoring weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }

    /// Weighted sum of percentage sub-scores, clamped to 0–100.
    pub fn combine(&self, required: f64, preferred: f64, keyword: f64, experience: f64) -> f64 {
        (self.required_skills * required
            + self.preferred_skills * preferred
            + self.keyword_match * keyword
            + self.experience * experience)
            .clamp(0.0, 100.0)
    }
}
