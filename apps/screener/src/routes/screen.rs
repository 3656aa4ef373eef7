//! Axum route handlers for the Screening API.

use std::path::Path;
use std::str::FromStr;

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ScreenError;
use crate::models::{JobRequirement, ResumeDocument};
use crate::output::{self, ResultRecord};
use crate::screening::{ScreeningOptions, ScreeningOutcome};
use crate::sources::{text_from_bytes, DocumentFormat, ResumeBatch, ResumeInput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseJdRequest {
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeSubmission {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    pub jd_text: String,
    pub resumes: Vec<ResumeSubmission>,
    #[serde(default)]
    pub top_n: Option<i64>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub run_id: Uuid,
    pub job_title: Option<String>,
    pub processed: usize,
    pub skipped: usize,
    pub results: Vec<ResultRecord>,
}

impl From<ScreeningOutcome> for ScreenResponse {
    fn from(outcome: ScreeningOutcome) -> Self {
        Self {
            run_id: outcome.run_id,
            job_title: outcome.job.title.clone(),
            processed: outcome.processed,
            skipped: outcome.skipped,
            results: output::records(&outcome.ranked),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jd/parse
///
/// Returns the structured requirement extracted from a job description.
/// Useful for checking what the taxonomy recognises before screening.
pub async fn handle_parse_jd(
    State(state): State<AppState>,
    Json(request): Json<ParseJdRequest>,
) -> Result<Json<JobRequirement>, ScreenError> {
    require_jd(&request.jd_text)?;
    let job = state.screener.parse_job(&request.jd_text)?;
    Ok(Json(job))
}

/// POST /api/v1/screen
///
/// Screens resumes submitted as JSON text against one job description.
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, ScreenError> {
    require_jd(&request.jd_text)?;
    if request.resumes.is_empty() {
        return Err(ScreenError::Validation(
            "resumes must contain at least one entry".to_string(),
        ));
    }
    let options = request_options(&state, request.top_n, request.min_score)?;

    let inputs = request
        .resumes
        .into_iter()
        .map(|r| {
            ResumeInput::Document(ResumeDocument {
                source_name: r.name.clone(),
                text: r.text,
                name: Some(r.name),
                email: r.email,
                phone: r.phone,
            })
        })
        .collect();
    let batch = ResumeBatch { inputs, skipped: 0 };

    let outcome = state.screener.run(&request.jd_text, batch, options).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/screen/upload
///
/// Multipart form: a `jd_text` field (or a `jd_file` part), any number of
/// resume file parts, and optional `top_n` / `min_score` fields.
/// Resume parts that cannot be decoded are skipped and counted.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, ScreenError> {
    let mut jd_text = String::new();
    let mut top_n = None;
    let mut min_score = None;
    let mut batch = ResumeBatch::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (field_name.as_str(), file_name) {
            ("jd_text", None) => jd_text = field.text().await.map_err(bad_multipart)?,
            ("jd_file", Some(file_name)) => {
                jd_text = decode_part(&file_name, field)
                    .await
                    .map_err(|e| ScreenError::Validation(format!("jd_file: {e}")))?;
            }
            ("top_n", None) => {
                let raw = field.text().await.map_err(bad_multipart)?;
                top_n = Some(parse_field("top_n", &raw)?);
            }
            ("min_score", None) => {
                let raw = field.text().await.map_err(bad_multipart)?;
                min_score = Some(parse_field("min_score", &raw)?);
            }
            (_, Some(file_name)) => match decode_part(&file_name, field).await {
                Ok(text) => batch
                    .inputs
                    .push(ResumeInput::Document(ResumeDocument::new(file_name, text))),
                Err(e) if e.is_recoverable() => {
                    warn!(resume = %file_name, error = %e, "Skipping uploaded resume");
                    batch.skipped += 1;
                }
                Err(e) => return Err(e),
            },
            (other, None) => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    require_jd(&jd_text)?;
    if batch.inputs.is_empty() && batch.skipped == 0 {
        return Err(ScreenError::Validation(
            "upload contains no resume files".to_string(),
        ));
    }
    let options = request_options(&state, top_n, min_score)?;

    let outcome = state.screener.run(&jd_text, batch, options).await?;
    Ok(Json(outcome.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_jd(jd_text: &str) -> Result<(), ScreenError> {
    if jd_text.trim().is_empty() {
        return Err(ScreenError::Validation("jd_text cannot be empty".to_string()));
    }
    Ok(())
}

fn request_options(
    state: &AppState,
    top_n: Option<i64>,
    min_score: Option<f64>,
) -> Result<ScreeningOptions, ScreenError> {
    if let Some(min) = min_score {
        if !(0.0..=100.0).contains(&min) {
            return Err(ScreenError::Validation(format!(
                "min_score must be between 0 and 100, got {min}"
            )));
        }
    }
    Ok(ScreeningOptions::resolve(top_n, min_score, &state.scoring))
}

/// Reads a file part fully. A broken body is the client's error; an
/// unsupported or undecodable document is a per-resume failure.
async fn decode_part(file_name: &str, field: Field<'_>) -> Result<String, ScreenError> {
    let format = DocumentFormat::from_path(Path::new(file_name));
    let bytes = field.bytes().await.map_err(bad_multipart)?;
    text_from_bytes(format?, bytes.to_vec())
        .await
        .map_err(|e| match e {
            ScreenError::Io { source, .. } => ScreenError::io(file_name, source),
            other => other,
        })
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<T, ScreenError> {
    raw.trim()
        .parse()
        .map_err(|_| ScreenError::Validation(format!("{name} is not a valid number: '{raw}'")))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ScreenError {
    ScreenError::Validation(format!("invalid multipart body: {e}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ScoringConfig;
    use crate::routes::build_router;
    use crate::scoring::WeightedScorer;
    use crate::screening::Screener;
    use crate::sources::FileTextExtractor;
    use crate::taxonomy::SkillTaxonomy;

    const JD: &str = "Data Engineer\nRequired skills: Python, SQL\nPreferred skills: Docker\nExperience: 3+ years";

    fn app() -> Router {
        let state = AppState {
            scoring: Arc::new(ScoringConfig::default()),
            screener: Screener::new(
                Arc::new(SkillTaxonomy::builtin().unwrap()),
                Arc::new(WeightedScorer::default()),
                Arc::new(FileTextExtractor),
            ),
        };
        build_router(state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_parse_jd() {
        let response = app()
            .oneshot(post_json("/api/v1/jd/parse", json!({ "jd_text": JD })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["required_skills"], json!(["python", "sql"]));
        assert_eq!(body["preferred_skills"], json!(["docker"]));
        assert_eq!(body["min_experience_years"], 3.0);
    }

    #[tokio::test]
    async fn test_empty_jd_is_bad_request() {
        let response = app()
            .oneshot(post_json("/api/v1/jd/parse", json!({ "jd_text": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_screen_ranks_candidates() {
        let request = json!({
            "jd_text": JD,
            "resumes": [
                { "name": "Bob", "text": "Python. 1 year of experience" },
                { "name": "Alice", "text": "Python, SQL, Docker. 5 years of experience",
                  "email": "alice@example.com" }
            ]
        });
        let response = app()
            .oneshot(post_json("/api/v1/screen", request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ScreenResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.processed, 2);
        assert_eq!(body.skipped, 0);
        assert_eq!(body.job_title.as_deref(), Some("Data Engineer"));
        assert_eq!(body.results[0].name, "Alice");
        assert_eq!(body.results[0].email.as_deref(), Some("alice@example.com"));
        assert_eq!(body.results[0].required_match_pct, 100.0);
        assert_eq!(body.results[1].name, "Bob");
        assert_eq!(body.results[1].missing_skills, vec!["sql"]);
        assert_eq!(body.results[1].experience_match_pct, 33.33);
    }

    #[tokio::test]
    async fn test_screen_rejects_bad_min_score() {
        let request = json!({
            "jd_text": JD,
            "resumes": [{ "name": "A", "text": "Python" }],
            "min_score": 150.0
        });
        let response = app()
            .oneshot(post_json("/api/v1/screen", request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_screen_requires_resumes() {
        let response = app()
            .oneshot(post_json("/api/v1/screen", json!({ "jd_text": JD, "resumes": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let boundary = "screener-test-boundary";
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            match file_name {
                Some(file) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/v1/screen/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_skips_unsupported_parts() {
        let request = multipart_request(&[
            ("jd_text", None, JD),
            ("top_n", None, "5"),
            ("resume", Some("alice.txt"), "Alice Smith\nPython, SQL, Docker"),
            ("resume", Some("bob.docx"), "binary stuff"),
        ]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ScreenResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.processed, 1);
        assert_eq!(body.skipped, 1);
        assert_eq!(body.results[0].name, "Alice Smith");
    }

    #[tokio::test]
    async fn test_upload_without_jd_is_bad_request() {
        let request = multipart_request(&[("resume", Some("alice.txt"), "Alice")]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_numeric_top_n() {
        let request = multipart_request(&[
            ("jd_text", None, JD),
            ("top_n", None, "lots"),
            ("resume", Some("alice.txt"), "Alice"),
        ]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
