use serde::Serialize;

use crate::candidate::Candidate;
use crate::constants::NEUTRAL_CRITERION_SCORE;

use super::keywords::extract_keywords;

const BASIC_SUMMARY_WEIGHT: f32 = 1.0;
const BASIC_EXPERIENCE_WEIGHT: f32 = 0.8;
const BASIC_TITLE_WEIGHT: f32 = 0.6;

const SUMMARY_WEIGHT: f32 = 1.0;
const EXPERIENCE_OR_TITLE_WEIGHT: f32 = 0.7;
const COMPANY_OR_EDUCATION_WEIGHT: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Score of one soft criterion.
pub struct CriterionScore {
    pub criterion: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Overall soft score with per-criterion detail (input order).
pub struct SoftScore {
    pub overall: f32,
    pub breakdown: Vec<CriterionScore>,
}

/// Whole-criterion keyword presence scoring.
///
/// Each criterion earns the weight of the first field (summary, experience,
/// titles) in which any of its words appears as a substring. The sum is
/// divided by the number of criteria. No criteria scores `1.0`.
pub fn score_soft_criteria_basic<S: AsRef<str>>(candidate: &Candidate, soft_criteria: &[S]) -> f32 {
    if soft_criteria.is_empty() {
        return 1.0;
    }

    let attrs = &candidate.attributes;
    let summary = attrs.summary_lower();
    let experience = attrs.joined_lower("experience");
    let titles = attrs.joined_lower("exp_titles");

    let total: f32 = soft_criteria
        .iter()
        .map(|criterion| {
            let lower = criterion.as_ref().to_lowercase();
            let words: Vec<&str> = lower.split_whitespace().collect();
            let found_in = |text: &str| words.iter().any(|w| text.contains(w));

            if found_in(&summary) {
                BASIC_SUMMARY_WEIGHT
            } else if found_in(&experience) {
                BASIC_EXPERIENCE_WEIGHT
            } else if found_in(&titles) {
                BASIC_TITLE_WEIGHT
            } else {
                0.0
            }
        })
        .sum();

    (total / soft_criteria.len() as f32).min(1.0)
}

/// Per-keyword field-weighted scoring.
///
/// Every keyword earns `1.0` in the summary, `0.7` in experience or titles,
/// `0.4` in companies or education. A criterion scores the capped mean over
/// its keywords; one without keywords scores a neutral `0.5`. The overall
/// score is the mean across criteria (`0.0` with none).
pub fn score_soft_criteria_enhanced<S: AsRef<str>>(
    candidate: &Candidate,
    soft_criteria: &[S],
) -> SoftScore {
    let attrs = &candidate.attributes;
    let summary = attrs.summary_lower();
    let experience = attrs.joined_lower("experience");
    let education = attrs.joined_lower("education");
    let titles = attrs.joined_lower("exp_titles");
    let companies = attrs.joined_lower("exp_companies");

    let breakdown: Vec<CriterionScore> = soft_criteria
        .iter()
        .map(|criterion| {
            let criterion = criterion.as_ref();
            let keywords = extract_keywords(criterion);

            let score = if keywords.is_empty() {
                NEUTRAL_CRITERION_SCORE
            } else {
                let matched: f32 = keywords
                    .iter()
                    .map(|kw| {
                        let kw = kw.as_str();
                        if summary.contains(kw) {
                            SUMMARY_WEIGHT
                        } else if experience.contains(kw) || titles.contains(kw) {
                            EXPERIENCE_OR_TITLE_WEIGHT
                        } else if companies.contains(kw) || education.contains(kw) {
                            COMPANY_OR_EDUCATION_WEIGHT
                        } else {
                            0.0
                        }
                    })
                    .sum();
                (matched / keywords.len() as f32).min(1.0)
            };

            CriterionScore {
                criterion: criterion.to_string(),
                score,
            }
        })
        .collect();

    let overall = if breakdown.is_empty() {
        0.0
    } else {
        breakdown.iter().map(|c| c.score).sum::<f32>() / breakdown.len() as f32
    };

    SoftScore { overall, breakdown }
}
