use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Screening error type.
///
/// `Config` and `Parse` are fatal for a run. `Io` and `UnsupportedFormat` are
/// per-resume failures: the pipeline logs them, counts the resume as skipped
/// and carries on. Scoring and ranking never produce an error.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ScreenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScreenError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that only affect a single resume.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScreenError::Io { .. } | ScreenError::UnsupportedFormat(_)
        )
    }
}

impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ScreenError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ScreenError::Parse(msg) => (StatusCode::BAD_REQUEST, "PARSE_ERROR", msg.clone()),
            ScreenError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            ScreenError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "The screening service is misconfigured".to_string(),
                )
            }
            ScreenError::Io { path, source } => {
                tracing::error!("I/O error on {}: {source}", path.display());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "A file could not be read".to_string(),
                )
            }
            ScreenError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
