//! Ranked results as files: CSV or pretty JSON, plus the console summary.
//!
//! Percentages stay unrounded through scoring and ranking; they are rounded
//! to two decimals here, on the way out.

pub mod summary;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ScreenError;
use crate::extraction::tokens;
use crate::scoring::RankedCandidate;

pub use summary::render_summary;

/// Longest slug kept in a file name.
const MAX_SLUG_LEN: usize = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// One ranked candidate with the fixed report field set. Used by the JSON
/// writer and the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub rank: usize,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_score: f64,
    pub required_match_pct: f64,
    pub preferred_match_pct: f64,
    pub experience_match_pct: f64,
    pub keyword_match_pct: f64,
    pub experience_years: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl From<&RankedCandidate> for ResultRecord {
    fn from(candidate: &RankedCandidate) -> Self {
        let b = &candidate.breakdown;
        Self {
            rank: candidate.rank,
            name: candidate.profile.name.clone(),
            email: candidate.profile.email.clone(),
            phone: candidate.profile.phone.clone(),
            total_score: round2(b.total_score),
            required_match_pct: round2(b.required_match_pct),
            preferred_match_pct: round2(b.preferred_match_pct),
            experience_match_pct: round2(b.experience_match_pct),
            keyword_match_pct: round2(b.keyword_match_pct),
            experience_years: round2(candidate.profile.experience_years),
            // BTreeSet iteration is already sorted
            matched_skills: b.matched_skills.iter().cloned().collect(),
            missing_skills: b.missing_skills.iter().cloned().collect(),
        }
    }
}

/// Flat CSV row: optional fields become empty cells, skill lists are joined.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    total_score: f64,
    required_match_pct: f64,
    preferred_match_pct: f64,
    experience_match_pct: f64,
    keyword_match_pct: f64,
    matched_skills: String,
    missing_skills: String,
}

impl<'a> From<&'a ResultRecord> for CsvRow<'a> {
    fn from(r: &'a ResultRecord) -> Self {
        Self {
            rank: r.rank,
            name: &r.name,
            email: r.email.as_deref().unwrap_or(""),
            phone: r.phone.as_deref().unwrap_or(""),
            total_score: r.total_score,
            required_match_pct: r.required_match_pct,
            preferred_match_pct: r.preferred_match_pct,
            experience_match_pct: r.experience_match_pct,
            keyword_match_pct: r.keyword_match_pct,
            matched_skills: r.matched_skills.join(", "),
            missing_skills: r.missing_skills.join(", "),
        }
    }
}

pub fn records(ranked: &[RankedCandidate]) -> Vec<ResultRecord> {
    ranked.iter().map(ResultRecord::from).collect()
}

pub fn write_csv<W: Write>(writer: W, records: &[ResultRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde headers are only emitted with the first row
        csv_writer.write_record(CSV_HEADERS)?;
    }
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

const CSV_HEADERS: [&str; 11] = [
    "rank",
    "name",
    "email",
    "phone",
    "total_score",
    "required_match_pct",
    "preferred_match_pct",
    "experience_match_pct",
    "keyword_match_pct",
    "matched_skills",
    "missing_skills",
];

pub fn write_json<W: Write>(mut writer: W, records: &[ResultRecord]) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    Ok(())
}

/// Writes `ranked` under `dir` (created if missing) and returns the file path.
pub fn write_results(
    ranked: &[RankedCandidate],
    format: OutputFormat,
    dir: &Path,
    slug: &str,
    now: NaiveDateTime,
) -> Result<PathBuf, ScreenError> {
    std::fs::create_dir_all(dir).map_err(|e| ScreenError::io(dir, e))?;
    let path = dir.join(report_file_name(slug, format, now));

    let file = File::create(&path).map_err(|e| ScreenError::io(&path, e))?;
    let writer = BufWriter::new(file);
    let records = records(ranked);
    match format {
        OutputFormat::Csv => write_csv(writer, &records).map_err(|e| csv_error(&path, e))?,
        OutputFormat::Json => write_json(writer, &records).map_err(|e| json_error(&path, e))?,
    }

    info!(path = %path.display(), rows = records.len(), "Results written");
    Ok(path)
}

fn csv_error(path: &Path, e: csv::Error) -> ScreenError {
    match e.into_kind() {
        csv::ErrorKind::Io(source) => ScreenError::io(path, source),
        other => ScreenError::Internal(anyhow::anyhow!("csv serialization failed: {other:?}")),
    }
}

fn json_error(path: &Path, e: serde_json::Error) -> ScreenError {
    if e.is_io() {
        ScreenError::io(path, e.into())
    } else {
        ScreenError::Internal(anyhow::Error::new(e).context("json serialization failed"))
    }
}

/// `results_<slug>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn report_file_name(slug: &str, format: OutputFormat, now: NaiveDateTime) -> String {
    format!(
        "results_{slug}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Slug from the job title, else the JD file stem, else `job`.
pub fn job_slug(title: Option<&str>, jd_path: Option<&Path>) -> String {
    let from_stem = jd_path
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned());
    [title.map(str::to_string), from_stem]
        .into_iter()
        .flatten()
        .map(|text| slugify(&text))
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| "job".to_string())
}

/// Lowercase alphanumeric words joined with `-`, cut on a word boundary.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for word in tokens::tokenize(text) {
        if !slug.is_empty() && slug.len() + 1 + word.len() > MAX_SLUG_LEN {
            break;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word);
    }
    slug.chars().take(MAX_SLUG_LEN).collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
