use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::errors::ScreenError;
use crate::scoring::ScoringWeights;

/// Number of candidates kept when neither the CLI nor the scoring file says otherwise.
pub const DEFAULT_TOP_N: i64 = 10;

/// Application configuration loaded from environment variables.
/// Every variable is optional; CLI flags override what is read here.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub taxonomy_path: Option<PathBuf>,
    pub scoring_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            output_dir: optional_env("SCREENER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
            taxonomy_path: optional_env("SCREENER_TAXONOMY").map(PathBuf::from),
            scoring_path: optional_env("SCREENER_SCORING").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Scoring file: weights plus optional default filters for a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub min_score: Option<f64>,
    pub top_n: Option<i64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: None,
            top_n: Some(DEFAULT_TOP_N),
        }
    }
}

impl ScoringConfig {
    /// Loads and validates the scoring file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ScreenError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ScreenError::Config(format!(
                        "cannot read scoring config {}: {e}",
                        path.display()
                    ))
                })?;
                Self::from_json_str(&raw)?
            }
            None => Self::default(),
        };
        info!(
            required = config.weights.required_skills,
            preferred = config.weights.preferred_skills,
            keyword = config.weights.keyword_match,
            experience = config.weights.experience,
            "Scoring weights loaded"
        );
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScreenError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ScreenError::Config(format!("invalid scoring config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScreenError> {
        self.weights.validate()?;
        if let Some(min) = self.min_score {
            if !(0.0..=100.0).contains(&min) {
                return Err(ScreenError::Config(format!(
                    "min_score must be between 0 and 100, got {min}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = ScoringConfig::load(None).unwrap();
        assert_eq!(config.weights, ScoringWeights::default());
        assert_eq!(config.top_n, Some(10));
        assert_eq!(config.min_score, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ScoringConfig::from_json_str(r#"{ "min_score": 55.5 }"#).unwrap();
        assert_eq!(config.min_score, Some(55.5));
        assert_eq!(config.top_n, Some(10));
        assert_eq!(config.weights, ScoringWeights::default());
    }

    #[test]
    fn test_custom_weights() {
        let config = ScoringConfig::from_json_str(
            r#"{ "weights": { "required_skills": 0.5, "preferred_skills": 0.1,
                 "keyword_match": 0.1, "experience": 0.3 }, "top_n": 3 }"#,
        )
        .unwrap();
        assert_eq!(config.weights.required_skills, 0.5);
        assert_eq!(config.top_n, Some(3));
    }

    #[test]
    fn test_weights_not_summing_to_one_rejected() {
        let err = ScoringConfig::from_json_str(
            r#"{ "weights": { "required_skills": 0.5, "preferred_skills": 0.5,
                 "keyword_match": 0.5, "experience": 0.5 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ScoringConfig::from_json_str(r#"{ "threshold": 3 }"#).unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[test]
    fn test_out_of_range_min_score_rejected() {
        let err = ScoringConfig::from_json_str(r#"{ "min_score": 120 }"#).unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ScoringConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        std::fs::write(&path, r#"{ "top_n": null }"#).unwrap();
        let config = ScoringConfig::load(Some(&path)).unwrap();
        assert_eq!(config.top_n, None);
    }
}
