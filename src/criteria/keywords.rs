use std::sync::LazyLock;

use regex::Regex;

/// Words dropped before keyword matching.
///
/// Includes `experience` and `advising`, which appear in nearly every
/// criterion and carry no signal on their own.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "been", "be", "have", "has", "had", "do", "does", "did",
    "will", "would", "should", "could", "may", "might", "must", "can", "experience", "advising",
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Extracts matchable keywords from a criterion.
///
/// Lowercases, splits on word boundaries, then drops stop words and tokens of
/// two characters or fewer. Order and duplicates are preserved.
pub fn extract_keywords(criterion: &str) -> Vec<String> {
    let lower = criterion.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
