//! Text extraction: turns a resume file into plain text.
//!
//! Plain-text formats are read with `tokio::fs`. PDF decoding is CPU-bound and
//! synchronous, so it runs inside `tokio::task::spawn_blocking`.

use std::path::Path;

use async_trait::async_trait;

use crate::errors::ScreenError;

/// File formats the extractor can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
}

impl DocumentFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ScreenError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" | "md" | "text" => Ok(DocumentFormat::Text),
            "pdf" => Ok(DocumentFormat::Pdf),
            "" => Err(ScreenError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(ScreenError::UnsupportedFormat(format!(
                ".{other} ({})",
                path.display()
            ))),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Pluggable text extraction. Implement this to add formats (or a test double)
/// without touching the pipeline.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ScreenError>;
}

/// Default extractor: text files and PDFs from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

#[async_trait]
impl TextExtractor for FileTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ScreenError> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ScreenError::io(path, e))?;
        let text = text_from_bytes(format, bytes).await.map_err(|e| match e {
            ScreenError::Io { source, .. } => ScreenError::io(path, source),
            other => other,
        })?;
        tracing::debug!(file = %path.display(), chars = text.len(), "Extracted resume text");
        Ok(text)
    }
}

/// Decodes an in-memory document, e.g. a multipart upload.
///
/// Text is decoded lossily so a stray byte never loses the whole resume.
/// A PDF that cannot be decoded is reported as `InvalidData` I/O, which the
/// pipeline treats as a per-resume failure.
pub async fn text_from_bytes(format: DocumentFormat, bytes: Vec<u8>) -> Result<String, ScreenError> {
    match format {
        DocumentFormat::Text => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DocumentFormat::Pdf => {
            // CPU-bound decode runs off the async executor.
            // A decoder panic only loses this one document.
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| invalid_pdf(format!("pdf decoder aborted: {e}")))?
                .map_err(|e| invalid_pdf(e.to_string()))
        }
    }
}

fn invalid_pdf(message: String) -> ScreenError {
    ScreenError::io(
        "<pdf>",
        std::io::Error::new(std::io::ErrorKind::InvalidData, message),
    )
}
