use std::sync::Arc;

use super::*;
use crate::candidate::{Candidate, CandidateAttributes};
use crate::embedding::{RelevanceScorer, RerankerError};

/// Scores documents from a fixed table keyed by document text.
struct FixedScorer(Vec<(&'static str, f32)>);

impl RelevanceScorer for FixedScorer {
    fn score_pairs(&self, _query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        Ok(documents
            .iter()
            .map(|doc| {
                self.0
                    .iter()
                    .find(|(text, _)| text == doc)
                    .map(|(_, s)| *s)
                    .unwrap_or(0.0)
            })
            .collect())
    }
}

struct ShortScorer;

impl RelevanceScorer for ShortScorer {
    fn score_pairs(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        Ok(vec![0.5])
    }
}

fn candidate(id: &str, distance: f32, summary: &str, degrees: &[&str]) -> Candidate {
    Candidate::new(
        id,
        Some(distance),
        CandidateAttributes {
            rerank_summary: summary.to_string(),
            deg_degrees: degrees.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        },
    )
}

const NO_CRITERIA: &[&str] = &[];

fn ids(scored: &[ScoredCandidate]) -> Vec<&str> {
    scored.iter().map(|s| s.id()).collect()
}

#[test]
fn test_min_max_normalize() {
    assert_eq!(min_max_normalize(&[1.0, 3.0, 2.0]), vec![0.0, 1.0, 0.5]);
    assert_eq!(min_max_normalize(&[0.4, 0.4]), vec![1.0, 1.0]);
    assert_eq!(min_max_normalize(&[7.0]), vec![1.0]);
    assert!(min_max_normalize(&[]).is_empty());
}

#[test]
fn test_min_max_normalize_keeps_close_values_apart() {
    let scaled = min_max_normalize(&[0.1, 0.100_000_08]);

    assert_eq!(scaled, vec![0.0, 1.0]);
}

#[test]
fn test_distance_scores() {
    assert_eq!(distance_scores(&[0.0, 1.0, 0.5]), vec![1.0, 0.0, 0.5]);
    assert_eq!(distance_scores(&[0.3, 0.3]), vec![1.0, 1.0]);
    assert_eq!(distance_scores(&[0.9]), vec![1.0]);
    assert!(distance_scores(&[]).is_empty());
}

#[test]
fn test_normalize_relevance_keeps_equal_scores_raw() {
    assert_eq!(normalize_relevance(&[0.25, 0.25]), vec![0.25, 0.25]);
    assert_eq!(normalize_relevance(&[0.2, 0.6]), vec![0.0, 1.0]);
}

#[test]
fn test_default_weights() {
    assert_eq!(RerankStrategy::Basic.default_weights(), ScoreWeights::basic());
    assert_eq!(ScoreWeights::enhanced().soft_criteria, 0.5);
    assert!((ScoreWeights::basic().combine(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
}

#[test]
fn test_weights_validation() {
    let negative = ScoreWeights {
        cross_encoder: -0.1,
        soft_criteria: 0.5,
        distance: 0.6,
    };
    let zero = ScoreWeights {
        cross_encoder: 0.0,
        soft_criteria: 0.0,
        distance: 0.0,
    };

    assert!(negative.validate().is_err());
    assert!(zero.validate().is_err());
    assert!(ScoreWeights::enhanced().validate().is_ok());
}

#[test]
fn test_strategy_parse() {
    assert_eq!("Basic".parse::<RerankStrategy>().unwrap(), RerankStrategy::Basic);
    assert_eq!(
        "enhanced".parse::<RerankStrategy>().unwrap(),
        RerankStrategy::Enhanced
    );
    assert!("fancy".parse::<RerankStrategy>().is_err());
}

#[test]
fn test_empty_input_returns_empty() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced);

    let scored = reranker.rerank("q", Vec::new(), NO_CRITERIA, NO_CRITERIA).unwrap();

    assert!(scored.is_empty());
}

#[test]
fn test_cross_encoder_dominates_basic() {
    let scorer = FixedScorer(vec![("weak", 0.1), ("strong", 0.9), ("mid", 0.5)]);
    let reranker = CandidateReranker::new(Arc::new(scorer), RerankStrategy::Basic);
    let candidates = vec![
        candidate("a", 0.2, "weak", &[]),
        candidate("b", 0.2, "strong", &[]),
        candidate("c", 0.2, "mid", &[]),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["b", "c", "a"]);
    assert_eq!(scored[0].ce_score, 1.0);
    assert_eq!(scored[2].ce_score, 0.0);
    // Equal distances and no soft criteria give full marks on both.
    assert!(scored.iter().all(|s| s.distance_score == 1.0 && s.soft_score == 1.0));
    assert!((scored[0].rerank_score - 1.0).abs() < 1e-6);
    assert!((scored[2].rerank_score - 0.4).abs() < 1e-6);
}

#[test]
fn test_distance_breaks_ties_when_cross_encoder_disabled() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("far", 0.9, "", &[]),
        candidate("near", 0.1, "", &[]),
        candidate("mid", 0.5, "", &[]),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["near", "mid", "far"]);
    assert!(scored.iter().all(|s| s.ce_score == 1.0));
    assert_eq!(scored[0].distance_score, 1.0);
    assert_eq!(scored[2].distance_score, 0.0);
}

#[test]
fn test_ties_keep_retrieval_order() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("first", 0.3, "", &[]),
        candidate("second", 0.3, "", &[]),
        candidate("third", 0.3, "", &[]),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["first", "second", "third"]);
}

#[test]
fn test_enhanced_drops_hard_criteria_failures() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("lawyer", 0.2, "Tax attorney", &["JD"]),
        candidate("doctor", 0.1, "Physician", &["MD"]),
    ];

    let scored = reranker
        .rerank("q", candidates, &["JD degree from an accredited law school"], NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["lawyer"]);
}

#[test]
fn test_basic_ignores_hard_criteria() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("lawyer", 0.2, "Tax attorney", &["JD"]),
        candidate("doctor", 0.1, "Physician", &["MD"]),
    ];

    let scored = reranker
        .rerank("q", candidates, &["JD degree"], NO_CRITERIA)
        .unwrap();

    assert_eq!(scored.len(), 2);
}

#[test]
fn test_all_filtered_out_returns_empty() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced);
    let candidates = vec![candidate("doctor", 0.1, "Physician", &["MD"])];

    let scored = reranker
        .rerank("q", candidates, &["JD degree"], NO_CRITERIA)
        .unwrap();

    assert!(scored.is_empty());
}

#[test]
fn test_enhanced_soft_breakdown() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("tax", 0.3, "Experienced tax attorney", &["JD"]),
        candidate("ip", 0.3, "Patent litigator", &["JD"]),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, &["tax expertise"])
        .unwrap();

    assert_eq!(ids(&scored), vec!["tax", "ip"]);
    let breakdown = scored[0].soft_breakdown.as_ref().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].criterion, "tax expertise");
    assert!(scored[0].soft_score > scored[1].soft_score);
}

#[test]
fn test_basic_has_no_breakdown() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic)
        .with_cross_encoder(false);
    let candidates = vec![candidate("a", 0.3, "Tax attorney", &[])];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, &["tax"])
        .unwrap();

    assert!(scored[0].soft_breakdown.is_none());
    assert_eq!(scored[0].soft_score, 1.0);
}

#[test]
fn test_missing_distance_counts_as_zero() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic)
        .with_cross_encoder(false);
    let mut unknown = candidate("unknown", 0.0, "", &[]);
    unknown.distance = None;
    let candidates = vec![candidate("known", 0.8, "", &[]), unknown];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["unknown", "known"]);
}

#[test]
fn test_score_count_mismatch_is_error() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic);
    let candidates = vec![candidate("a", 0.1, "x", &[]), candidate("b", 0.2, "y", &[])];

    let err = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap_err();

    assert!(matches!(err, ScoringError::ComputationFailed { .. }));
}

#[test]
fn test_custom_weights_rejected_when_invalid() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic);
    let bad = ScoreWeights {
        cross_encoder: f32::NAN,
        soft_criteria: 0.5,
        distance: 0.5,
    };

    assert!(reranker.with_weights(bad).is_err());
}

#[test]
fn test_equal_distances_score_full_marks() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced)
        .with_cross_encoder(false);
    let candidates = vec![candidate("a", 0.3, "", &[]), candidate("b", 0.3, "", &[])];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert!(scored.iter().all(|s| s.distance_score == 1.0));
    assert!(scored.iter().all(|s| (s.rerank_score - 1.0).abs() < 1e-6));
}

#[test]
fn test_sole_hard_filter_survivor_scores_full_distance() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Enhanced)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("lawyer", 0.7, "Tax attorney", &["JD"]),
        candidate("doctor", 0.1, "Physician", &["MD"]),
    ];

    let scored = reranker
        .rerank("q", candidates, &["JD degree"], NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["lawyer"]);
    assert_eq!(scored[0].distance_score, 1.0);
}

#[test]
fn test_close_distances_still_rank_nearer_first() {
    let reranker = CandidateReranker::new(Arc::new(ShortScorer), RerankStrategy::Basic)
        .with_cross_encoder(false);
    let candidates = vec![
        candidate("far", 0.100_000_08, "", &[]),
        candidate("near", 0.1, "", &[]),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["near", "far"]);
    assert_eq!(scored[0].distance_score, 1.0);
    assert_eq!(scored[1].distance_score, 0.0);
}

#[test]
fn test_equal_cross_encoder_scores_stay_raw() {
    let scorer = FixedScorer(vec![("x", 0.25), ("y", 0.25)]);
    let reranker = CandidateReranker::new(Arc::new(scorer), RerankStrategy::Basic);
    let candidates = vec![candidate("a", 0.2, "x", &[]), candidate("b", 0.4, "y", &[])];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert!(scored.iter().all(|s| s.ce_score == 0.25));
    assert_eq!(ids(&scored), vec!["a", "b"]);
}

#[test]
fn test_basic_scores_education_first_fallback_text() {
    let scorer = FixedScorer(vec![("JD Tax counsel", 0.9), ("MD Physician", 0.1)]);
    let reranker = CandidateReranker::new(Arc::new(scorer), RerankStrategy::Basic);
    let profile = |id: &str, education: &str, experience: &str| {
        Candidate::new(
            id,
            Some(0.3),
            CandidateAttributes {
                education: vec![education.to_string()],
                experience: vec![experience.to_string()],
                ..Default::default()
            },
        )
    };
    let candidates = vec![
        profile("doctor", "MD", "Physician"),
        profile("lawyer", "JD", "Tax counsel"),
    ];

    let scored = reranker
        .rerank("q", candidates, NO_CRITERIA, NO_CRITERIA)
        .unwrap();

    assert_eq!(ids(&scored), vec!["lawyer", "doctor"]);
    assert_eq!(scored[0].ce_score, 1.0);
}
