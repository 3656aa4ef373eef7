//! Resume sources: where job descriptions and resumes come from.
//!
//! A source resolves to an ordered list of `ResumeInput`s. Files are only
//! listed here; reading and decoding happen later, per resume, so one bad
//! file never aborts the batch.

pub mod extractor;
pub mod jsonl;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::ScreenError;
use crate::models::ResumeDocument;

pub use extractor::{text_from_bytes, DocumentFormat, FileTextExtractor, TextExtractor};

/// Stem keywords that mark a file as the job description in folder mode.
const JD_STEM_HINTS: &[&str] = &[
    "job",
    "jd",
    "description",
    "opening",
    "position",
    "role",
    "vacancy",
];

/// Stem keywords that mark a file as a resume in folder mode.
const RESUME_STEM_HINTS: &[&str] = &["resume", "cv", "candidate"];

/// One resume awaiting extraction.
#[derive(Debug, Clone)]
pub enum ResumeInput {
    /// A file still to be read and decoded.
    File(PathBuf),
    /// A record whose text is already in memory (JSONL, HTTP).
    Document(ResumeDocument),
}

impl ResumeInput {
    pub fn label(&self) -> String {
        match self {
            ResumeInput::File(path) => path.display().to_string(),
            ResumeInput::Document(doc) => doc.source_name.clone(),
        }
    }
}

/// Resolved resume inputs plus entries already lost while listing them.
#[derive(Debug, Default)]
pub struct ResumeBatch {
    pub inputs: Vec<ResumeInput>,
    pub skipped: usize,
}

/// Job description file and resume files found in one folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderLayout {
    pub job_description: PathBuf,
    pub resumes: Vec<PathBuf>,
}

/// Resolves `--resumes`: a directory of resume files or a `.jsonl` dataset.
///
/// A directory with no files, or a dataset with no usable record, is a
/// fatal input error.
pub async fn load_resumes(path: &Path) -> Result<ResumeBatch, ScreenError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ScreenError::io(path, e))?;

    let batch = if metadata.is_dir() {
        let files = list_files(path).await?;
        if files.is_empty() {
            return Err(ScreenError::Config(format!(
                "resume directory {} contains no files",
                path.display()
            )));
        }
        ResumeBatch {
            inputs: files.into_iter().map(ResumeInput::File).collect(),
            skipped: 0,
        }
    } else if is_jsonl(path) {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScreenError::io(path, e))?;
        let parsed = jsonl::parse_jsonl(&raw, &path.display().to_string());
        if parsed.documents.is_empty() {
            return Err(ScreenError::Config(format!(
                "resume dataset {} contains no usable records",
                path.display()
            )));
        }
        ResumeBatch {
            inputs: parsed
                .documents
                .into_iter()
                .map(ResumeInput::Document)
                .collect(),
            skipped: parsed.skipped,
        }
    } else {
        return Err(ScreenError::Config(format!(
            "--resumes must be a directory or a .jsonl file, got {}",
            path.display()
        )));
    };

    info!(
        source = %path.display(),
        resumes = batch.inputs.len(),
        skipped = batch.skipped,
        "Resume source resolved"
    );
    Ok(batch)
}

/// Reads the job description. Any failure here is fatal for the run.
pub async fn read_job_description(
    path: &Path,
    extractor: &dyn TextExtractor,
) -> Result<String, ScreenError> {
    let text = extractor.extract(path).await?;
    if text.trim().is_empty() {
        return Err(ScreenError::Parse(format!(
            "job description {} is empty",
            path.display()
        )));
    }
    Ok(text)
}

/// Splits a folder into its job description and resumes.
///
/// The job description is the first supported file (name order) whose stem
/// hints at a posting and not at a resume; failing that, the first supported
/// file whose stem does not look like a resume. Every other supported file is
/// a resume.
pub async fn split_folder(dir: &Path) -> Result<FolderLayout, ScreenError> {
    let files: Vec<PathBuf> = list_files(dir)
        .await?
        .into_iter()
        .filter(|p| DocumentFormat::is_supported(p))
        .collect();

    let jd_index = files
        .iter()
        .position(|p| {
            stem_contains_any(p, JD_STEM_HINTS) && !stem_contains_any(p, RESUME_STEM_HINTS)
        })
        .or_else(|| {
            files
                .iter()
                .position(|p| !stem_contains_any(p, RESUME_STEM_HINTS))
        })
        .ok_or_else(|| {
            ScreenError::Config(format!(
                "no job description found in {}",
                dir.display()
            ))
        })?;

    let mut resumes = files;
    let job_description = resumes.remove(jd_index);
    if resumes.is_empty() {
        return Err(ScreenError::Config(format!(
            "no resumes found in {}",
            dir.display()
        )));
    }

    info!(
        job_description = %job_description.display(),
        resumes = resumes.len(),
        "Folder split"
    );
    Ok(FolderLayout {
        job_description,
        resumes,
    })
}

/// Regular, non-hidden files directly inside `dir`, sorted by file name.
async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScreenError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ScreenError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ScreenError::io(dir, e))?
    {
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        match entry.file_type().await {
            Ok(kind) if kind.is_file() && !hidden => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(file = %path.display(), error = %e, "Cannot stat directory entry"),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_jsonl(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"))
}

fn stem_contains_any(path: &Path, hints: &[&str]) -> bool {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    hints.iter().any(|hint| stem.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_directory_listed_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.txt", "B");
        write(dir.path(), "a.pdf", "A");
        write(dir.path(), "c.docx", "C");
        write(dir.path(), ".DS_Store", "");
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let batch = load_resumes(dir.path()).await.unwrap();
        let labels: Vec<String> = batch.inputs.iter().map(ResumeInput::label).collect();
        assert_eq!(labels.len(), 3);
        assert!(labels[0].ends_with("a.pdf"));
        assert!(labels[1].ends_with("b.txt"));
        assert!(labels[2].ends_with("c.docx"));
    }

    #[tokio::test]
    async fn test_empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_resumes(dir.path()).await.unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_resume_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_resumes(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, ScreenError::Io { .. }));
    }

    #[tokio::test]
    async fn test_jsonl_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "resumes.jsonl",
            "{\"Name\": \"Ana\", \"Text\": \"Python\"}\nnot json\n",
        );
        let batch = load_resumes(&path).await.unwrap();
        assert_eq!(batch.inputs.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert!(matches!(&batch.inputs[0], ResumeInput::Document(d) if d.name.as_deref() == Some("Ana")));
    }

    #[tokio::test]
    async fn test_plain_file_rejected_as_resume_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "resume.txt", "Python");
        let err = load_resumes(&path).await.unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[tokio::test]
    async fn test_folder_prefers_jd_hint() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "alice_resume.txt", "Alice");
        write(dir.path(), "bob.txt", "Bob");
        write(dir.path(), "job_posting.md", "Data Engineer");
        write(dir.path(), "notes.docx", "ignored");

        let layout = split_folder(dir.path()).await.unwrap();
        assert!(layout.job_description.ends_with("job_posting.md"));
        assert_eq!(names(&layout.resumes), vec!["alice_resume.txt", "bob.txt"]);
    }

    #[tokio::test]
    async fn test_folder_falls_back_to_first_non_resume() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a_cv.txt", "A");
        write(dir.path(), "backend.txt", "Backend Engineer");
        write(dir.path(), "z_resume.txt", "Z");

        let layout = split_folder(dir.path()).await.unwrap();
        assert!(layout.job_description.ends_with("backend.txt"));
        assert_eq!(names(&layout.resumes), vec!["a_cv.txt", "z_resume.txt"]);
    }

    #[tokio::test]
    async fn test_folder_without_jd_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one_resume.txt", "A");
        write(dir.path(), "two_cv.txt", "B");
        let err = split_folder(dir.path()).await.unwrap_err();
        assert!(matches!(err, ScreenError::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "jd.txt", "  \n ");
        let err = read_job_description(&path, &FileTextExtractor).await.unwrap_err();
        assert!(matches!(err, ScreenError::Parse(_)));
    }
}
