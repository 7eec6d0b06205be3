use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::candidate::Candidate;

static YEARS_REQUIRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*\+?\s*year").expect("years pattern is valid"));

/// Minimum years of experience named by a criterion, if it asks for any.
///
/// Only criteria mentioning both "year" and "experience" count. Counts too
/// large for `u64` saturate.
pub fn required_years(criterion: &str) -> Option<u64> {
    let lower = criterion.to_lowercase();
    if !(lower.contains("year") && lower.contains("experience")) {
        return None;
    }

    YEARS_REQUIRED
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
}

fn mentions_law_degree(criterion_lower: &str) -> bool {
    criterion_lower.contains("jd")
        || criterion_lower.contains("juris doctor")
        || criterion_lower.contains("law school")
}

fn has_law_degree(candidate: &Candidate) -> bool {
    candidate.attributes.deg_degrees.iter().any(|degree| {
        let degree = degree.to_lowercase();
        degree.contains("jd") || degree.contains("doctor of law")
    })
}

/// Largest numeric experience bucket, `None` when no bucket parses.
fn max_experience_bucket(candidate: &Candidate) -> Option<u64> {
    candidate
        .attributes
        .exp_years
        .iter()
        .filter_map(|bucket| bucket.replace('+', "").trim().parse::<u64>().ok())
        .max()
}

/// Returns `true` if the candidate satisfies every hard criterion.
///
/// Criteria the matcher does not recognise pass. Candidates without any
/// experience data pass year requirements since they cannot be checked.
pub fn passes_hard_criteria<S: AsRef<str>>(candidate: &Candidate, hard_criteria: &[S]) -> bool {
    for criterion in hard_criteria {
        let lower = criterion.as_ref().to_lowercase();

        if mentions_law_degree(&lower) && !has_law_degree(candidate) {
            trace!(id = %candidate.id, criterion = %lower, "Missing law degree");
            return false;
        }

        if let Some(required) = required_years(&lower)
            && !candidate.attributes.exp_years.is_empty()
        {
            let max_bucket = max_experience_bucket(candidate).unwrap_or(0);
            if max_bucket < required {
                trace!(
                    id = %candidate.id,
                    required,
                    max_bucket,
                    "Not enough years of experience"
                );
                return false;
            }
        }
    }

    true
}
