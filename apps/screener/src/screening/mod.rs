//! Screening pipeline: JD parse → concurrent resume extraction → scoring → ranking.
//!
//! Resumes are extracted on a `JoinSet`, one task per resume, sharing the
//! taxonomy through an `Arc`. Results are gathered back into source order
//! before scoring so logs and ties never depend on task scheduling.
//!
//! A resume that cannot be read is logged and counted as skipped; only a bad
//! job description aborts the run.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::errors::ScreenError;
use crate::extraction::{jd_parser, resume_parser};
use crate::models::{CandidateProfile, JobRequirement, ResumeDocument};
use crate::scoring::{rank, CandidateScorer, RankedCandidate, ScoredCandidate};
use crate::sources::{ResumeBatch, ResumeInput, TextExtractor};
use crate::taxonomy::SkillTaxonomy;

/// Filters applied after scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreeningOptions {
    pub min_score: Option<f64>,
    pub top_n: Option<i64>,
}

impl ScreeningOptions {
    /// Explicit values win over the scoring file.
    pub fn resolve(top_n: Option<i64>, min_score: Option<f64>, scoring: &ScoringConfig) -> Self {
        Self {
            min_score: min_score.or(scoring.min_score),
            top_n: top_n.or(scoring.top_n),
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub run_id: Uuid,
    pub job: JobRequirement,
    pub ranked: Vec<RankedCandidate>,
    /// Resumes turned into profiles and scored.
    pub processed: usize,
    /// Resumes that could not be read or decoded.
    pub skipped: usize,
}

/// Owns the shared, read-only collaborators of a screening run.
#[derive(Clone)]
pub struct Screener {
    taxonomy: Arc<SkillTaxonomy>,
    scorer: Arc<dyn CandidateScorer>,
    extractor: Arc<dyn TextExtractor>,
    today: Option<NaiveDate>,
}

impl Screener {
    pub fn new(
        taxonomy: Arc<SkillTaxonomy>,
        scorer: Arc<dyn CandidateScorer>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            taxonomy,
            scorer,
            extractor,
            today: None,
        }
    }

    /// Pins the date that closes open-ended ranges such as `2020 - Present`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn extractor(&self) -> &dyn TextExtractor {
        self.extractor.as_ref()
    }

    pub fn parse_job(&self, jd_text: &str) -> Result<JobRequirement, ScreenError> {
        jd_parser::parse_jd(jd_text, &self.taxonomy)
    }

    /// Runs one full screening inside a `screening_run` span.
    pub async fn run(
        &self,
        jd_text: &str,
        batch: ResumeBatch,
        options: ScreeningOptions,
    ) -> Result<ScreeningOutcome, ScreenError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("screening_run", %run_id);
        self.run_inner(run_id, jd_text, batch, options)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        jd_text: &str,
        batch: ResumeBatch,
        options: ScreeningOptions,
    ) -> Result<ScreeningOutcome, ScreenError> {
        let job = self.parse_job(jd_text)?;
        info!(
            title = job.title.as_deref().unwrap_or("-"),
            required = job.required_skills.len(),
            preferred = job.preferred_skills.len(),
            min_experience_years = job.min_experience_years,
            resumes = batch.inputs.len(),
            scorer = self.scorer.backend(),
            "Screening started"
        );

        let (profiles, failed) = self.extract_profiles(batch.inputs).await;
        let skipped = batch.skipped + failed;
        let processed = profiles.len();

        let scored: Vec<ScoredCandidate> = profiles
            .into_iter()
            .map(|profile| {
                let breakdown = self.scorer.score(&job, &profile);
                ScoredCandidate { profile, breakdown }
            })
            .collect();
        let ranked = rank(scored, options.min_score, options.top_n);

        info!(
            processed,
            skipped,
            ranked = ranked.len(),
            "Screening finished"
        );

        Ok(ScreeningOutcome {
            run_id,
            job,
            ranked,
            processed,
            skipped,
        })
    }

    /// Extracts every resume concurrently. Returns profiles in input order and
    /// the number of resumes that failed.
    async fn extract_profiles(&self, inputs: Vec<ResumeInput>) -> (Vec<CandidateProfile>, usize) {
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let total = inputs.len();

        let mut tasks = JoinSet::new();
        for (index, input) in inputs.into_iter().enumerate() {
            let taxonomy = Arc::clone(&self.taxonomy);
            let extractor = Arc::clone(&self.extractor);
            tasks.spawn(
                async move {
                    let label = input.label();
                    let result = load_document(input, extractor.as_ref())
                        .await
                        .map(|doc| resume_parser::extract_profile(&doc, &taxonomy, today));
                    (index, label, result)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<CandidateProfile>> = vec![None; total];
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(profile))) => slots[index] = Some(profile),
                Ok((_, label, Err(e))) if e.is_recoverable() => {
                    warn!(resume = %label, error = %e, "Skipping resume");
                    failed += 1;
                }
                Ok((_, label, Err(e))) => {
                    error!(resume = %label, error = %e, "Skipping resume after unexpected failure");
                    failed += 1;
                }
                Err(e) => {
                    error!(error = %e, "Resume extraction task aborted");
                    failed += 1;
                }
            }
        }

        (slots.into_iter().flatten().collect(), failed)
    }
}

async fn load_document(
    input: ResumeInput,
    extractor: &dyn TextExtractor,
) -> Result<ResumeDocument, ScreenError> {
    match input {
        ResumeInput::Document(doc) => Ok(doc),
        ResumeInput::File(path) => {
            let text = extractor.extract(&path).await?;
            Ok(ResumeDocument::new(file_name(&path), text))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use async_trait::async_trait;

    use super::*;
    use crate::scoring::WeightedScorer;
    use crate::sources::FileTextExtractor;

    const JD: &str = "Data Engineer\n\
        Required skills: Python, SQL\n\
        Preferred skills: Docker\n\
        Experience: 3+ years of experience building pipelines\n";

    /// Serves resume text from memory; names starting with `bad` fail.
    struct MemoryExtractor(Vec<(&'static str, &'static str)>);

    #[async_trait]
    impl TextExtractor for MemoryExtractor {
        async fn extract(&self, path: &Path) -> Result<String, ScreenError> {
            let name = file_name(path);
            if name.starts_with("bad") {
                return Err(ScreenError::UnsupportedFormat(name));
            }
            self.0
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| {
                    ScreenError::io(path, std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
                })
        }
    }

    fn screener(extractor: Arc<dyn TextExtractor>) -> Screener {
        Screener::new(
            Arc::new(SkillTaxonomy::builtin().unwrap()),
            Arc::new(WeightedScorer::default()),
            extractor,
        )
        .with_today(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn files(names: &[&str]) -> ResumeBatch {
        ResumeBatch {
            inputs: names
                .iter()
                .map(|n| ResumeInput::File(PathBuf::from(n)))
                .collect(),
            skipped: 0,
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_two_candidate_scenario() {
        let extractor = MemoryExtractor(vec![
            ("alice.txt", "Alice Smith\nPython, SQL and Docker\n5 years of experience"),
            ("bob.txt", "Bob Jones\nPython scripting\n1 year of experience"),
        ]);
        let outcome = screener(Arc::new(extractor))
            .run(JD, files(&["bob.txt", "alice.txt"]), ScreeningOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.job.required_skills, set(&["python", "sql"]));
        assert_eq!(outcome.job.preferred_skills, set(&["docker"]));
        assert_eq!(outcome.job.min_experience_years, 3.0);
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.skipped, 0);

        let alice = &outcome.ranked[0];
        assert_eq!(alice.rank, 1);
        assert_eq!(alice.profile.name, "Alice Smith");
        assert_eq!(alice.breakdown.required_match_pct, 100.0);
        assert_eq!(alice.breakdown.preferred_match_pct, 100.0);
        assert_eq!(alice.breakdown.experience_match_pct, 100.0);

        let bob = &outcome.ranked[1];
        assert_eq!(bob.profile.name, "Bob Jones");
        assert_eq!(bob.breakdown.required_match_pct, 50.0);
        assert_eq!(bob.breakdown.missing_skills, set(&["sql"]));
        assert!((bob.breakdown.experience_match_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failed_resumes_are_skipped_not_fatal() {
        let extractor = MemoryExtractor(vec![("ok.txt", "Ok Person\nPython")]);
        let mut batch = files(&["bad.docx", "ok.txt", "ghost.txt"]);
        batch.skipped = 1;

        let outcome = screener(Arc::new(extractor))
            .run(JD, batch, ScreeningOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.ranked.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_jd_aborts_run() {
        let err = screener(Arc::new(MemoryExtractor(vec![])))
            .run("  ", files(&["a.txt"]), ScreeningOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Parse(_)));
    }

    #[tokio::test]
    async fn test_options_filter_and_cut() {
        let extractor = MemoryExtractor(vec![
            ("a.txt", "Ann\nPython SQL Docker, 4 years of experience"),
            ("b.txt", "Ben\nPython SQL, 4 years of experience"),
            ("c.txt", "Cat\nNothing relevant"),
        ]);
        let options = ScreeningOptions {
            min_score: Some(30.0),
            top_n: Some(1),
        };
        let outcome = screener(Arc::new(extractor))
            .run(JD, files(&["c.txt", "b.txt", "a.txt"]), options)
            .await
            .unwrap();
        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.ranked.len(), 1);
        assert_eq!(outcome.ranked[0].profile.name, "Ann");
    }

    #[tokio::test]
    async fn test_documents_and_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dana_lee.txt");
        std::fs::write(&path, "dana@lee.dev\nPython, SQL, Docker").unwrap();

        let batch = ResumeBatch {
            inputs: vec![
                ResumeInput::File(path),
                ResumeInput::Document(ResumeDocument {
                    name: Some("Eve".to_string()),
                    ..ResumeDocument::new("resume_2", "Python only")
                }),
            ],
            skipped: 0,
        };
        let outcome = screener(Arc::new(FileTextExtractor))
            .run(JD, batch, ScreeningOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = outcome.ranked.iter().map(|r| r.profile.name.as_str()).collect();
        assert_eq!(names, vec!["dana lee", "Eve"]);
    }

    #[test]
    fn test_explicit_options_override_scoring_file() {
        let scoring = ScoringConfig {
            min_score: Some(40.0),
            ..ScoringConfig::default()
        };
        let options = ScreeningOptions::resolve(Some(3), None, &scoring);
        assert_eq!(options.top_n, Some(3));
        assert_eq!(options.min_score, Some(40.0));
        assert_eq!(ScreeningOptions::resolve(None, None, &scoring).top_n, Some(10));
    }

    #[tokio::test]
    async fn test_run_ids_are_unique() {
        let s = screener(Arc::new(MemoryExtractor(vec![("a.txt", "A")])));
        let first = s.run(JD, files(&["a.txt"]), ScreeningOptions::default()).await.unwrap();
        let second = s.run(JD, files(&["a.txt"]), ScreeningOptions::default()).await.unwrap();
        assert_ne!(first.run_id, second.run_id);
    }
}
