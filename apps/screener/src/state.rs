use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::screening::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default `top_n` / `min_score` for requests that do not set them.
    pub scoring: Arc<ScoringConfig>,
    /// Taxonomy, scorer and extractor, loaded once at startup.
    pub screener: Screener,
}
