//! JD Parser: extracts required/preferred skills, minimum experience and the
//! keyword set from a raw job description.
//!
//! Parsing is permissive: a description without recognisable sections still
//! yields a valid (if sparse) `JobRequirement`. Only empty text is an error.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::ScreenError;
use crate::extraction::{patterns, tokens};
use crate::models::JobRequirement;
use crate::taxonomy::SkillTaxonomy;

/// Heading markers that open a required-skills section.
const REQUIRED_MARKERS: &[&str] = &[
    "required skills",
    "required qualifications",
    "skills required",
    "required",
    "requirements",
    "key requirements",
    "technical requirements",
    "must have",
    "mandatory",
    "essential skills",
    "core skills",
    "minimum qualifications",
    "basic qualifications",
    "what you need",
];

/// Heading markers that open a preferred-skills section.
const PREFERRED_MARKERS: &[&str] = &[
    "preferred skills",
    "preferred qualifications",
    "preferred",
    "nice to have",
    "good to have",
    "desired skills",
    "bonus points",
    "bonus",
    "a plus",
    "additional skills",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Required,
    Preferred,
}

/// Raw text collected under the required and preferred headings.
#[derive(Debug, Default, PartialEq)]
struct SkillSections {
    required: String,
    preferred: String,
}

impl SkillSections {
    fn push(&mut self, kind: Option<SectionKind>, text: &str) {
        let target = match kind {
            Some(SectionKind::Required) => &mut self.required,
            Some(SectionKind::Preferred) => &mut self.preferred,
            None => return,
        };
        if text.trim().is_empty() {
            return;
        }
        target.push_str(text.trim());
        target.push('\n');
    }
}

/// All markers as one alternation, longest first so `required skills` wins
/// over `required`.
fn marker_alternation() -> String {
    let mut markers: Vec<&str> = REQUIRED_MARKERS
        .iter()
        .chain(PREFERRED_MARKERS)
        .copied()
        .collect();
    markers.sort_by(|a, b| b.len().cmp(&a.len()));
    markers
        .iter()
        .map(|m| m.split(' ').map(regex::escape).collect::<Vec<_>>().join(r"[\s-]+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// A marker anywhere in a line, directly followed by a colon.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:^|[\s.;,(])({})\s*:", marker_alternation()))
        .expect("valid section marker regex")
});

/// A heading that starts with a marker and may carry more words before the
/// colon: `Required Skills & Qualifications:`, `Must-Have Skills:`.
/// Group 2 is empty when the line ends without a colon.
static HEADING_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^({})\b[^:\n]{{0,40}}?(:|$)",
        marker_alternation()
    ))
    .expect("valid heading marker regex")
});

/// A short `Label:` prefix, e.g. `About: ...` or `Location: Remote`.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z /&]{0,30}:").expect("valid label regex"));

const BULLETS: [char; 6] = ['-', '*', '•', '·', '>', '–'];

/// Parses a raw job description into a `JobRequirement`.
pub fn parse_jd(jd_text: &str, taxonomy: &SkillTaxonomy) -> Result<JobRequirement, ScreenError> {
    if jd_text.trim().is_empty() {
        return Err(ScreenError::Parse("job description text is empty".to_string()));
    }

    let sections = split_sections(jd_text);
    let required_skills = skills_from_section(&sections.required, taxonomy);
    let preferred_skills: BTreeSet<String> = skills_from_section(&sections.preferred, taxonomy)
        .difference(&required_skills)
        .cloned()
        .collect();

    let min_experience_years = patterns::required_experience_years(jd_text).unwrap_or(0.0);
    let keywords = tokens::keyword_set(jd_text);

    debug!(
        required = required_skills.len(),
        preferred = preferred_skills.len(),
        keywords = keywords.len(),
        min_experience_years,
        "Parsed job description"
    );

    Ok(JobRequirement {
        title: job_title(jd_text),
        required_skills,
        preferred_skills,
        min_experience_years,
        keywords,
    })
}

/// First non-empty line, stripped of heading decoration.
fn job_title(text: &str) -> Option<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Walks the description line by line, routing text into the section opened
/// by the most recent marker. A heading line may carry words after its marker
/// (`Required Skills & Qualifications:`), and a marker may open a section
/// mid-line (`Required: Java. Preferred: Docker`). Any other heading, or an
/// unbulleted `Label:` line, closes the section.
fn split_sections(text: &str) -> SkillSections {
    let mut sections = SkillSections::default();
    let mut current: Option<SectionKind> = None;

    for raw_line in text.lines() {
        let is_markdown_heading = raw_line.trim_start().starts_with('#');
        let is_bulleted = raw_line.trim_start().starts_with(BULLETS);
        let line = strip_bullet(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some(kind) = marker_kind(line) {
            current = Some(kind);
            continue;
        }

        let mut cursor = 0;
        if !is_bulleted {
            if let Some((kind, end)) = heading_marker(line, is_markdown_heading) {
                current = Some(kind);
                cursor = end;
            }
        }

        let rest_start = cursor;
        for caps in MARKER_RE.captures_iter(&line[rest_start..]) {
            let (Some(whole), Some(marker)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            sections.push(current, &line[cursor..rest_start + marker.start()]);
            current = marker_kind(marker.as_str());
            cursor = rest_start + whole.end();
        }

        // Bulleted lines ending in a colon introduce nested items, not a new section.
        let is_heading = is_markdown_heading
            || (!is_bulleted && (line.ends_with(':') || LABEL_RE.is_match(line)));
        if cursor == 0 && is_heading {
            current = None;
            continue;
        }
        sections.push(current, &line[cursor..]);
    }

    sections
}

/// Section kind and byte offset past the heading when `line` opens with a
/// marker heading. Without a colon only a markdown heading qualifies, so
/// prose such as `Required to travel` does not open a section.
fn heading_marker(line: &str, is_markdown_heading: bool) -> Option<(SectionKind, usize)> {
    let caps = HEADING_MARKER_RE.captures(line)?;
    let has_colon = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    if !has_colon && !is_markdown_heading {
        return None;
    }
    let kind = marker_kind(caps.get(1)?.as_str())?;
    Some((kind, caps.get(0)?.end()))
}

/// Section opened by a bare marker such as `Nice to have` or `Requirements:`.
fn marker_kind(text: &str) -> Option<SectionKind> {
    let normalized = text
        .trim()
        .trim_end_matches(':')
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if REQUIRED_MARKERS.contains(&normalized.as_str()) {
        Some(SectionKind::Required)
    } else if PREFERRED_MARKERS.contains(&normalized.as_str()) {
        Some(SectionKind::Preferred)
    } else {
        None
    }
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(BULLETS)
        .trim_start_matches('#')
        .trim()
}

/// Splits a section on commas, semicolons and newlines and resolves each item.
///
/// An item that is itself a synonym resolves directly; otherwise the item is
/// scanned for whole-word synonyms, so `Experience with AWS or Azure` yields
/// both. Items naming no known skill are dropped.
fn skills_from_section(section: &str, taxonomy: &SkillTaxonomy) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    for item in section.split([',', ';', '\n']) {
        let item = item.trim().trim_matches(|c: char| c == '.' || c == ':' || c.is_whitespace());
        if item.is_empty() {
            continue;
        }
        match taxonomy.normalize(item) {
            Some(canonical) => {
                skills.insert(canonical.to_string());
            }
            None => skills.extend(taxonomy.find_in_text(item)),
        }
    }
    skills
}
