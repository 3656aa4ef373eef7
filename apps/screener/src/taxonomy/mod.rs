//! Skill taxonomy: canonical skill names and the synonyms that resolve to them.
//!
//! Loaded once per run and passed explicitly to the extractors. Lookups are
//! case-insensitive and exact; there is no fuzzy matching. When a synonym is
//! claimed by more than one skill, the skill listed first keeps it.

mod defaults;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::ScreenError;

/// One canonical skill and the matcher over the synonyms it owns.
#[derive(Debug, Clone)]
struct SkillEntry {
    canonical: String,
    matcher: Option<Regex>,
}

#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    entries: Vec<SkillEntry>,
    lookup: HashMap<String, usize>,
}

impl SkillTaxonomy {
    /// Builds a taxonomy from `(canonical, synonyms)` pairs in priority order.
    ///
    /// The canonical name is always treated as one of its own synonyms.
    pub fn new<I, S>(skills: I) -> Result<Self, ScreenError>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut entries: Vec<SkillEntry> = Vec::new();
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (canonical, synonyms) in skills {
            let canonical = normalize_phrase(canonical.as_ref());
            if canonical.is_empty() {
                return Err(ScreenError::Config(
                    "taxonomy contains an empty skill name".to_string(),
                ));
            }
            if entries.iter().any(|e| e.canonical == canonical) {
                return Err(ScreenError::Config(format!(
                    "skill '{canonical}' is defined more than once"
                )));
            }

            let index = entries.len();
            let mut owned = Vec::new();
            let candidates = std::iter::once(canonical.clone())
                .chain(synonyms.iter().map(|s| normalize_phrase(s.as_ref())));

            for synonym in candidates {
                if synonym.is_empty() {
                    return Err(ScreenError::Config(format!(
                        "skill '{canonical}' has an empty synonym"
                    )));
                }
                match lookup.get(&synonym) {
                    Some(&owner) if owner != index => {
                        debug!(
                            "Synonym '{synonym}' already claimed by '{}', ignored for '{canonical}'",
                            entries[owner].canonical
                        );
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(synonym.clone(), index);
                        owned.push(synonym);
                    }
                }
            }

            entries.push(SkillEntry {
                canonical,
                matcher: build_matcher(&owned)?,
            });
        }

        Ok(Self { entries, lookup })
    }

    /// The built-in taxonomy.
    pub fn builtin() -> Result<Self, ScreenError> {
        Self::new(
            defaults::DEFAULT_SKILLS
                .iter()
                .map(|(canonical, synonyms)| (*canonical, synonyms.to_vec())),
        )
    }

    /// Loads the taxonomy file at `path`, or the built-in table when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ScreenError> {
        let taxonomy = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ScreenError::Config(format!(
                        "cannot read taxonomy {}: {e}",
                        path.display()
                    ))
                })?;
                Self::from_json_str(&raw)?
            }
            None => Self::builtin()?,
        };
        if taxonomy.is_empty() {
            warn!("Skill taxonomy is empty; no skill will ever match");
        }
        info!("Skill taxonomy loaded: {} skills", taxonomy.len());
        Ok(taxonomy)
    }

    /// Parses a taxonomy document.
    ///
    /// Accepts a flat `{ canonical: [synonyms] }` object, a categorised
    /// `{ category: { canonical: [synonyms] } }` object, or a mix of both.
    /// Document order is priority order.
    pub fn from_json_str(raw: &str) -> Result<Self, ScreenError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ScreenError::Config(format!("taxonomy is not valid JSON: {e}")))?;
        let Value::Object(root) = value else {
            return Err(ScreenError::Config(
                "taxonomy must be a JSON object".to_string(),
            ));
        };

        let mut skills: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in &root {
            match value {
                Value::Array(_) => skills.push((key.clone(), synonym_list(key, value)?)),
                Value::Object(category) => collect_category(key, category, &mut skills)?,
                _ => {
                    return Err(ScreenError::Config(format!(
                        "taxonomy entry '{key}' must be a synonym list or a category object"
                    )))
                }
            }
        }

        if skills.is_empty() {
            return Err(ScreenError::Config("taxonomy defines no skills".to_string()));
        }

        Self::new(skills)
    }

    /// Resolves a token or phrase to its canonical skill name.
    pub fn normalize(&self, token: &str) -> Option<&str> {
        self.lookup
            .get(&normalize_phrase(token))
            .map(|&i| self.entries[i].canonical.as_str())
    }

    /// Canonical names of every skill with a whole-word synonym occurrence in `text`.
    pub fn find_in_text(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.matcher.as_ref().is_some_and(|m| m.is_match(&lowered)))
            .map(|e| e.canonical.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_category(
    category: &str,
    skills_in_category: &Map<String, Value>,
    out: &mut Vec<(String, Vec<String>)>,
) -> Result<(), ScreenError> {
    if skills_in_category.is_empty() {
        warn!("Taxonomy category '{category}' is empty");
    }
    for (canonical, synonyms) in skills_in_category {
        if !synonyms.is_array() {
            return Err(ScreenError::Config(format!(
                "skill '{canonical}' in category '{category}' must map to a synonym list"
            )));
        }
        out.push((canonical.clone(), synonym_list(canonical, synonyms)?));
    }
    Ok(())
}

fn synonym_list(canonical: &str, value: &Value) -> Result<Vec<String>, ScreenError> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ScreenError::Config(format!(
                    "skill '{canonical}' has a non-string synonym: {item}"
                ))
            })
        })
        .collect()
}

/// Lowercases and collapses internal whitespace.
fn normalize_phrase(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds a case-folded whole-word matcher. Boundaries are any non-alphanumeric
/// character so synonyms like `c++` or `.net` match.
fn build_matcher(synonyms: &[String]) -> Result<Option<Regex>, ScreenError> {
    if synonyms.is_empty() {
        return Ok(None);
    }
    let mut sorted: Vec<&String> = synonyms.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = sorted
        .iter()
        .map(|s| {
            s.split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?:^|[^\p{{L}}\p{{N}}_])(?:{alternation})(?:[^\p{{L}}\p{{N}}_]|$)");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| ScreenError::Config(format!("invalid synonym pattern: {e}")))
}
