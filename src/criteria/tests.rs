use super::*;
use crate::candidate::{Candidate, CandidateAttributes};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn tax_attorney() -> Candidate {
    Candidate::new(
        "1",
        Some(0.5),
        CandidateAttributes {
            rerank_summary: "Tax attorney with 5 years experience handling IRS audits and \
                             advising on tax implications"
                .to_string(),
            deg_degrees: strings(&["JD"]),
            exp_titles: strings(&["Tax Attorney"]),
            exp_years: strings(&["5"]),
            ..Default::default()
        },
    )
}

fn engineer() -> Candidate {
    Candidate::new(
        "3",
        Some(0.4),
        CandidateAttributes {
            rerank_summary: "Software engineer".to_string(),
            deg_degrees: strings(&["Bachelor's"]),
            exp_titles: strings(&["Engineer"]),
            exp_years: strings(&["10"]),
            ..Default::default()
        },
    )
}

#[test]
fn test_extract_keywords_drops_stop_words_and_short_tokens() {
    assert_eq!(
        extract_keywords("Experience handling IRS audits"),
        vec!["handling", "irs", "audits"]
    );
    assert_eq!(
        extract_keywords("Experience advising clients on tax implications"),
        vec!["clients", "tax", "implications"]
    );
    assert!(extract_keywords("to be or an of").is_empty());
}

#[test]
fn test_extract_keywords_splits_punctuation() {
    assert_eq!(
        extract_keywords("M&A, private-equity deals"),
        vec!["private", "equity", "deals"]
    );
}

#[test]
fn test_required_years() {
    assert_eq!(required_years("3+ years of legal practice experience"), Some(3));
    assert_eq!(required_years("At least 10 years experience"), Some(10));
    assert_eq!(required_years("5 years in banking"), None);
    assert_eq!(required_years("Experience with audits"), None);
}

#[test]
fn test_hard_criteria_law_degree() {
    let hard = ["JD degree from an accredited U.S. law school"];

    assert!(passes_hard_criteria(&tax_attorney(), &hard));
    assert!(!passes_hard_criteria(&engineer(), &hard));
}

#[test]
fn test_hard_criteria_doctor_of_law_counts() {
    let mut candidate = engineer();
    candidate.attributes.deg_degrees = strings(&["Doctor of Law"]);

    assert!(passes_hard_criteria(&candidate, &["Juris Doctor"]));
}

#[test]
fn test_hard_criteria_years() {
    let hard = ["7+ years of experience"];

    assert!(!passes_hard_criteria(&tax_attorney(), &hard));
    assert!(passes_hard_criteria(&engineer(), &hard));
}

#[test]
fn test_hard_criteria_years_with_plus_bucket() {
    let mut candidate = tax_attorney();
    candidate.attributes.exp_years = strings(&["3", "10+"]);

    assert!(passes_hard_criteria(&candidate, &["8 years experience"]));
}

#[test]
fn test_hard_criteria_huge_year_count_fails() {
    let hard = ["99999999999999999999999 years of experience"];

    assert_eq!(required_years(hard[0]), Some(u64::MAX));
    assert!(!passes_hard_criteria(&tax_attorney(), &hard));
}

#[test]
fn test_hard_criteria_missing_years_passes() {
    let mut candidate = tax_attorney();
    candidate.attributes.exp_years.clear();

    assert!(passes_hard_criteria(&candidate, &["20+ years of experience"]));
}

#[test]
fn test_hard_criteria_unparseable_buckets_fail() {
    let mut candidate = tax_attorney();
    candidate.attributes.exp_years = strings(&["unknown"]);

    assert!(!passes_hard_criteria(&candidate, &["2 years experience"]));
}

#[test]
fn test_hard_criteria_unrecognised_passes() {
    assert!(passes_hard_criteria(&engineer(), &["Fluent in Spanish"]));
    assert!(passes_hard_criteria::<&str>(&engineer(), &[]));
}

#[test]
fn test_basic_soft_no_criteria_is_full_score() {
    assert_eq!(score_soft_criteria_basic::<&str>(&engineer(), &[]), 1.0);
}

#[test]
fn test_basic_soft_field_weights() {
    let candidate = Candidate::new(
        "x",
        None,
        CandidateAttributes {
            rerank_summary: "Handles IRS audits".to_string(),
            experience: strings(&["Structured partnership deals"]),
            exp_titles: strings(&["Counsel"]),
            ..Default::default()
        },
    );

    assert_eq!(score_soft_criteria_basic(&candidate, &["IRS"]), 1.0);
    assert!((score_soft_criteria_basic(&candidate, &["partnership"]) - 0.8).abs() < 1e-6);
    assert!((score_soft_criteria_basic(&candidate, &["counsel"]) - 0.6).abs() < 1e-6);
    assert_eq!(score_soft_criteria_basic(&candidate, &["zoology"]), 0.0);
    assert!(
        (score_soft_criteria_basic(&candidate, &["partnership", "zoology"]) - 0.4).abs() < 1e-6
    );
}

#[test]
fn test_enhanced_soft_breakdown() {
    let soft = [
        "Experience handling IRS audits",
        "Experience advising clients on tax implications",
    ];
    let result = score_soft_criteria_enhanced(&tax_attorney(), &soft);

    assert_eq!(result.breakdown.len(), 2);
    assert_eq!(result.breakdown[0].criterion, soft[0]);
    assert!((result.breakdown[0].score - 1.0).abs() < 1e-6);
    assert!((result.breakdown[1].score - 2.0 / 3.0).abs() < 1e-6);
    assert!((result.overall - 5.0 / 6.0).abs() < 1e-6);
}

#[test]
fn test_enhanced_soft_lower_tier_fields() {
    let candidate = Candidate::new(
        "x",
        None,
        CandidateAttributes {
            education: strings(&["Stanford Law"]),
            exp_companies: strings(&["Deloitte"]),
            exp_titles: strings(&["Auditor"]),
            ..Default::default()
        },
    );

    let result = score_soft_criteria_enhanced(&candidate, &["Deloitte auditor stanford"]);

    // deloitte 0.4 + auditor 0.7 + stanford 0.4 over three keywords
    assert!((result.overall - 0.5).abs() < 1e-6);
}

#[test]
fn test_enhanced_soft_neutral_without_keywords() {
    let result = score_soft_criteria_enhanced(&engineer(), &["to be"]);

    assert_eq!(result.breakdown[0].score, 0.5);
    assert_eq!(result.overall, 0.5);
}

#[test]
fn test_enhanced_soft_empty_is_zero() {
    let result = score_soft_criteria_enhanced::<&str>(&engineer(), &[]);

    assert_eq!(result.overall, 0.0);
    assert!(result.breakdown.is_empty());
}
