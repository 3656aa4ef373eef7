//! Resume Parser: turns raw resume text into a `CandidateProfile`.
//!
//! Never fails: missing contact details, skills or dates simply leave the
//! corresponding fields empty or zero.

use chrono::NaiveDate;
use tracing::debug;

use crate::extraction::patterns;
use crate::models::{CandidateProfile, ResumeDocument};
use crate::taxonomy::SkillTaxonomy;

/// How many leading non-empty lines are considered for the candidate name.
const NAME_SCAN_LINES: usize = 5;

const NOT_A_NAME: &[&str] = &[
    "resume",
    "résumé",
    "curriculum vitae",
    "cv",
    "summary",
    "profile",
    "contact",
    "objective",
];

/// Extracts a profile from one resume.
///
/// `today` closes open-ended date ranges such as `2021 - Present`.
pub fn extract_profile(
    document: &ResumeDocument,
    taxonomy: &SkillTaxonomy,
    today: NaiveDate,
) -> CandidateProfile {
    let text = document.text.as_str();

    let name = document
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| name_from_heading(text))
        .unwrap_or_else(|| name_from_source(&document.source_name));
    let email = document
        .email
        .clone()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| patterns::email(text));
    let phone = document
        .phone
        .clone()
        .filter(|p| !p.trim().is_empty())
        .or_else(|| patterns::phone(text));

    let skills = taxonomy.find_in_text(text);
    let experience_years = experience_years(text, today);

    debug!(
        candidate = %name,
        skills = skills.len(),
        experience_years,
        "Extracted resume profile"
    );

    CandidateProfile {
        name,
        email,
        phone,
        skills,
        experience_years,
        raw_text: document.text.clone(),
    }
}

/// Explicit "N years" statements win over date arithmetic. Date ranges are
/// merged before summing so overlapping jobs are not double counted.
pub fn experience_years(text: &str, today: NaiveDate) -> f64 {
    patterns::explicit_experience_years(text)
        .unwrap_or_else(|| patterns::total_years(patterns::date_ranges(text, today)))
        .max(0.0)
}

/// First plausible name line near the top of the resume.
fn name_from_heading(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| looks_like_name(line))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 5 || line.len() > 60 {
        return false;
    }
    if line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if NOT_A_NAME.contains(&line.to_lowercase().trim_end_matches(':')) {
        return false;
    }
    words.iter().all(|w| {
        w.chars().next().is_some_and(char::is_alphabetic)
            && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
    })
}

/// File stem with separators turned into spaces, e.g. `jane_doe.pdf` → `jane doe`.
fn name_from_source(source_name: &str) -> String {
    let stem = std::path::Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_name);
    let name = stem
        .split(['_', '-', '.'])
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = r#"
        John Doe
        john.doe@email.com | 555-123-4567

        Senior Java Developer with 8 years of experience

        Skills: Java, Spring Boot, Hibernate, MySQL, AWS, Docker, Kubernetes

        Experience:
        Senior Developer at Tech Corp (2018 - Present)
        - Developed microservices using Spring Boot and Docker
    "#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::builtin().unwrap()
    }

    #[test]
    fn test_sample_resume_profile() {
        let doc = ResumeDocument::new("john.pdf", SAMPLE_RESUME);
        let profile = extract_profile(&doc, &taxonomy(), today());

        assert_eq!(profile.name, "John Doe");
        assert_eq!(profile.email.as_deref(), Some("john.doe@email.com"));
        assert_eq!(profile.phone.as_deref(), Some("555-123-4567"));
        for skill in ["java", "spring", "hibernate", "mysql", "aws", "docker", "kubernetes", "microservices"] {
            assert!(profile.skills.contains(skill), "missing {skill}");
        }
        // explicit mention beats the 2018 - Present date range
        assert_eq!(profile.experience_years, 8.0);
        assert_eq!(profile.raw_text, SAMPLE_RESUME);
    }

    #[test]
    fn test_date_ranges_used_without_explicit_mention() {
        let text = "Jane Roe\nAcme 2015 - 2019\nGlobex 2018 - 2021\nInitech 2023 - 2024";
        let years = experience_years(text, today());
        // 2015-2021 merged (6) + 2023-2024 (1)
        assert!((years - 7.0).abs() < 1e-9, "got {years}");
    }

    #[test]
    fn test_empty_resume_is_valid_profile() {
        let doc = ResumeDocument::new("blank_candidate.txt", "");
        let profile = extract_profile(&doc, &taxonomy(), today());
        assert_eq!(profile.name, "blank candidate");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.experience_years, 0.0);
        assert_eq!(profile.email, None);
        assert_eq!(profile.phone, None);
    }

    #[test]
    fn test_name_skips_generic_headings_and_contact_lines() {
        let text = "RESUME\njane@x.io\nJane Q. Public\nEngineer";
        assert_eq!(name_from_heading(text).as_deref(), Some("Jane Q. Public"));
    }

    #[test]
    fn test_name_falls_back_to_file_stem() {
        let doc = ResumeDocument::new("alex-smith_cv.txt", "5 years of experience with Python");
        let profile = extract_profile(&doc, &taxonomy(), today());
        assert_eq!(profile.name, "alex smith cv");
    }

    #[test]
    fn test_document_overrides_take_precedence() {
        let doc = ResumeDocument {
            source_name: "RESUME_7".to_string(),
            text: "Someone Else\nother@mail.com".to_string(),
            name: Some("Bob".to_string()),
            email: Some("bob@corp.com".to_string()),
            phone: None,
        };
        let profile = extract_profile(&doc, &taxonomy(), today());
        assert_eq!(profile.name, "Bob");
        assert_eq!(profile.email.as_deref(), Some("bob@corp.com"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let doc = ResumeDocument {
            source_name: "r.txt".to_string(),
            text: "Ana Lima\nana@lima.dev".to_string(),
            name: Some("  ".to_string()),
            email: Some(String::new()),
            phone: None,
        };
        let profile = extract_profile(&doc, &taxonomy(), today());
        assert_eq!(profile.name, "Ana Lima");
        assert_eq!(profile.email.as_deref(), Some("ana@lima.dev"));
    }
}
