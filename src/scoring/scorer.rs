use std::sync::Arc;

use tracing::{debug, info};

use crate::candidate::Candidate;
use crate::criteria::{
    CriterionScore, passes_hard_criteria, score_soft_criteria_basic, score_soft_criteria_enhanced,
};
use crate::embedding::RelevanceScorer;

use super::error::ScoringError;
use super::types::{
    RerankStrategy, ScoreWeights, ScoredCandidate, distance_scores, normalize_relevance,
};

/// Combines cross-encoder relevance, soft-criteria matching and vector
/// distance into one ranking.
#[derive(Clone)]
pub struct CandidateReranker {
    cross_encoder: Arc<dyn RelevanceScorer>,
    strategy: RerankStrategy,
    weights: ScoreWeights,
    use_cross_encoder: bool,
}

impl std::fmt::Debug for CandidateReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateReranker")
            .field("strategy", &self.strategy)
            .field("weights", &self.weights)
            .field("use_cross_encoder", &self.use_cross_encoder)
            .finish()
    }
}

impl CandidateReranker {
    pub fn new(cross_encoder: Arc<dyn RelevanceScorer>, strategy: RerankStrategy) -> Self {
        Self {
            cross_encoder,
            strategy,
            weights: strategy.default_weights(),
            use_cross_encoder: true,
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    /// With the cross-encoder off every candidate gets a cross-encoder score of `1.0`.
    pub fn with_cross_encoder(mut self, enabled: bool) -> Self {
        self.use_cross_encoder = enabled;
        self
    }

    pub fn strategy(&self) -> RerankStrategy {
        self.strategy
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Scores and sorts `candidates`, best first.
    ///
    /// The enhanced strategy drops candidates failing any hard criterion
    /// before scoring. Ties keep retrieval order.
    pub fn rerank<H: AsRef<str>, S: AsRef<str>>(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        hard_criteria: &[H],
        soft_criteria: &[S],
    ) -> Result<Vec<ScoredCandidate>, ScoringError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = match self.strategy {
            RerankStrategy::Basic => candidates,
            RerankStrategy::Enhanced => {
                let before = candidates.len();
                let kept: Vec<Candidate> = candidates
                    .into_iter()
                    .filter(|c| passes_hard_criteria(c, hard_criteria))
                    .collect();
                info!(before, after = kept.len(), "Applied hard criteria");
                kept
            }
        };

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ce_scores = self.cross_encoder_scores(query, &candidates)?;

        let distances: Vec<f32> = candidates.iter().map(Candidate::distance_or_zero).collect();
        let dist_scores = distance_scores(&distances);

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(ce_scores)
            .zip(dist_scores)
            .map(|((candidate, ce_score), distance_score)| {
                let (soft_score, soft_breakdown) = self.soft_score(&candidate, soft_criteria);
                ScoredCandidate {
                    rerank_score: self.weights.combine(ce_score, soft_score, distance_score),
                    candidate,
                    ce_score,
                    soft_score,
                    distance_score,
                    soft_breakdown,
                }
            })
            .collect();

        // `sort_by` is stable, so equal scores keep retrieval order.
        scored.sort_by(|a, b| b.rerank_score.total_cmp(&a.rerank_score));

        debug!(
            strategy = %self.strategy,
            scored = scored.len(),
            top_score = scored.first().map(|s| s.rerank_score),
            "Re-ranking complete"
        );

        Ok(scored)
    }

    fn cross_encoder_scores(
        &self,
        query: &str,
        candidates: &[Candidate],
    ) -> Result<Vec<f32>, ScoringError> {
        if !self.use_cross_encoder {
            return Ok(vec![1.0; candidates.len()]);
        }

        let documents: Vec<String> = candidates
            .iter()
            .map(|c| c.rerank_text(self.strategy))
            .collect();
        let raw = self.cross_encoder.score_pairs(query, &documents)?;

        if raw.len() != candidates.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!(
                    "cross-encoder returned {} scores for {} candidates",
                    raw.len(),
                    candidates.len()
                ),
            });
        }

        Ok(normalize_relevance(&raw))
    }

    fn soft_score<S: AsRef<str>>(
        &self,
        candidate: &Candidate,
        soft_criteria: &[S],
    ) -> (f32, Option<Vec<CriterionScore>>) {
        if soft_criteria.is_empty() {
            return (1.0, None);
        }

        match self.strategy {
            RerankStrategy::Basic => (score_soft_criteria_basic(candidate, soft_criteria), None),
            RerankStrategy::Enhanced => {
                let soft = score_soft_criteria_enhanced(candidate, soft_criteria);
                (soft.overall, Some(soft.breakdown))
            }
        }
    }
}
