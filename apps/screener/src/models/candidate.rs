use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Structured profile extracted from one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub experience_years: f64,
    /// Source text for keyword matching. Not serialized into reports.
    #[serde(skip_serializing, default)]
    pub raw_text: String,
}

/// Raw resume text plus whatever identity the source already knows.
///
/// File sources only know the file name; JSONL records may carry the
/// candidate's name, email and phone, which take precedence over extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    /// File name or record id, used as the name fallback.
    pub source_name: String,
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ResumeDocument {
    pub fn new(source_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}
