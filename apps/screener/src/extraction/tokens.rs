use std::collections::BTreeSet;

/// Fixed English stopword list applied to job-description keywords.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "may", "me",
    "might", "more", "most", "must", "my", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "out", "over", "own", "per", "plus", "same", "shall",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "us", "very", "via", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "within", "would", "you", "your", "yours",
];

/// Lowercase alphanumeric runs of `text`, in order of appearance.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Distinct tokens of `text`.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).collect()
}

/// Distinct tokens of `text` that can carry meaning as keywords: stopwords,
/// single characters and bare numbers are dropped.
pub fn keyword_set(text: &str) -> BTreeSet<String> {
    tokenize(text).filter(|t| is_keyword(t)).collect()
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() > 1
        && !token.chars().all(|c| c.is_ascii_digit())
        && !STOPWORDS.contains(&token)
}
