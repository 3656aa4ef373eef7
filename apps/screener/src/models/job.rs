use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Structured requirement set extracted from a job description.
///
/// Built once per run and shared read-only across every scoring call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    /// First non-empty line of the description, used for output naming.
    pub title: Option<String>,
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    pub min_experience_years: f64,
    /// Lowercase tokens of the description, stopwords excluded.
    pub keywords: BTreeSet<String>,
}

impl JobRequirement {
    /// Required and preferred skills together.
    pub fn all_skills(&self) -> BTreeSet<String> {
        self.required_skills
            .union(&self.preferred_skills)
            .cloned()
            .collect()
    }
}
