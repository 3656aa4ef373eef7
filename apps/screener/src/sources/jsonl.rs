//! JSONL resume datasets: one JSON object per line.
//!
//! Recognised keys follow the common public resume dumps: `ResumeID`, `Name`,
//! `Email`, `Phone`, `Category`, plus free-text fields that are joined into
//! the resume body.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::ResumeDocument;

/// Free-text fields joined (in this order) to form the resume body.
const TEXT_FIELDS: &[&str] = &["Text", "Experience", "Skills", "Summary", "Education"];

/// Identity fields never used as resume body.
const IDENTITY_FIELDS: &[&str] = &["ResumeID", "Name", "Email", "Phone", "Category"];

/// Parsed dataset plus the number of lines that could not be used.
#[derive(Debug, Default)]
pub struct JsonlBatch {
    pub documents: Vec<ResumeDocument>,
    pub skipped: usize,
}

/// Parses a JSONL dataset. Blank lines are ignored; malformed lines are
/// logged and counted as skipped.
pub fn parse_jsonl(raw: &str, source: &str) -> JsonlBatch {
    let mut batch = JsonlBatch::default();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => batch.documents.push(document_from_record(&record, line_no)),
            Ok(_) => {
                warn!(source, line = line_no, "Skipping JSONL line: not a JSON object");
                batch.skipped += 1;
            }
            Err(e) => {
                warn!(source, line = line_no, error = %e, "Skipping malformed JSONL line");
                batch.skipped += 1;
            }
        }
    }

    batch
}

fn document_from_record(record: &Map<String, Value>, line_no: usize) -> ResumeDocument {
    let source_name = record
        .get("ResumeID")
        .and_then(scalar_string)
        .map(|id| format!("resume_{id}"))
        .unwrap_or_else(|| format!("line_{line_no}"));

    let mut parts: Vec<String> = TEXT_FIELDS
        .iter()
        .filter_map(|key| record.get(*key).and_then(scalar_string))
        .collect();
    if parts.is_empty() {
        parts = record
            .iter()
            .filter(|(key, _)| !IDENTITY_FIELDS.contains(&key.as_str()))
            .filter_map(|(_, value)| value.as_str().map(str::to_string))
            .filter(|s| !s.trim().is_empty())
            .collect();
    }

    ResumeDocument {
        source_name,
        text: parts.join(" "),
        name: record.get("Name").and_then(scalar_string),
        email: record.get("Email").and_then(scalar_string),
        phone: record.get("Phone").and_then(scalar_string),
    }
}

/// Strings and numbers as text; blank strings, nulls and containers as `None`.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
