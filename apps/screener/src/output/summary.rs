use std::fmt::Write;

use crate::output::round2;
use crate::screening::ScreeningOutcome;

/// Rows shown in the console summary.
const SUMMARY_ROWS: usize = 5;

/// Console table of the best candidates followed by the processed/skipped line.
pub fn render_summary(outcome: &ScreeningOutcome) -> String {
    let mut out = String::new();
    let title = outcome.job.title.as_deref().unwrap_or("job description");
    let _ = writeln!(out, "Top candidates for {title}:");

    if outcome.ranked.is_empty() {
        let _ = writeln!(out, "  (no candidate met the criteria)");
    }
    for candidate in outcome.ranked.iter().take(SUMMARY_ROWS) {
        let b = &candidate.breakdown;
        let _ = writeln!(
            out,
            "  {:>2}. {:<28} {:>6.2}  req {:>6.2}%  pref {:>6.2}%  exp {:>6.2}%  kw {:>6.2}%",
            candidate.rank,
            truncate(&candidate.profile.name, 28),
            round2(b.total_score),
            round2(b.required_match_pct),
            round2(b.preferred_match_pct),
            round2(b.experience_match_pct),
            round2(b.keyword_match_pct),
        );
    }

    let _ = writeln!(
        out,
        "Resumes processed: {}, skipped: {}",
        outcome.processed, outcome.skipped
    );
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use uuid::Uuid;

    use super::*;
    use crate::models::{CandidateProfile, JobRequirement};
    use crate::scoring::{RankedCandidate, ScoreBreakdown};

    fn outcome(count: usize) -> ScreeningOutcome {
        let ranked = (1..=count)
            .map(|rank| RankedCandidate {
                rank,
                profile: CandidateProfile {
                    name: format!("Candidate {rank}"),
                    ..CandidateProfile::default()
                },
                breakdown: ScoreBreakdown {
                    required_match_pct: 50.0,
                    preferred_match_pct: 0.0,
                    keyword_match_pct: 10.0,
                    experience_match_pct: 100.0,
                    total_score: 100.0 - rank as f64,
                    matched_skills: BTreeSet::new(),
                    missing_skills: BTreeSet::new(),
                },
            })
            .collect();
        ScreeningOutcome {
            run_id: Uuid::new_v4(),
            job: JobRequirement {
                title: Some("Backend Engineer".to_string()),
                ..JobRequirement::default()
            },
            ranked,
            processed: count,
            skipped: 2,
        }
    }

    #[test]
    fn test_summary_shows_top_five() {
        let text = render_summary(&outcome(7));
        assert!(text.starts_with("Top candidates for Backend Engineer:"));
        assert!(text.contains("Candidate 5"));
        assert!(!text.contains("Candidate 6"));
        assert!(text.trim_end().ends_with("Resumes processed: 7, skipped: 2"));
    }

    #[test]
    fn test_summary_without_candidates() {
        let text = render_summary(&outcome(0));
        assert!(text.contains("no candidate met the criteria"));
        assert!(text.contains("processed: 0, skipped: 2"));
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
