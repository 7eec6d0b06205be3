use serde::Serialize;

use crate::candidate::Candidate;
use crate::criteria::CriterionScore;

use super::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
/// How soft criteria and hard criteria take part in re-ranking.
pub enum RerankStrategy {
    /// Whole-criterion keyword presence; hard criteria ignored.
    Basic,
    /// Hard-criteria elimination followed by per-keyword field-weighted scoring.
    #[default]
    Enhanced,
}

impl RerankStrategy {
    pub fn default_weights(self) -> ScoreWeights {
        match self {
            RerankStrategy::Basic => ScoreWeights::basic(),
            RerankStrategy::Enhanced => ScoreWeights::enhanced(),
        }
    }
}

impl std::str::FromStr for RerankStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(RerankStrategy::Basic),
            "enhanced" => Ok(RerankStrategy::Enhanced),
            other => Err(format!("unknown rerank strategy '{other}'")),
        }
    }
}

impl std::fmt::Display for RerankStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RerankStrategy::Basic => write!(f, "basic"),
            RerankStrategy::Enhanced => write!(f, "enhanced"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Weights of the three score components in the final score.
pub struct ScoreWeights {
    pub cross_encoder: f32,
    pub soft_criteria: f32,
    pub distance: f32,
}

impl ScoreWeights {
    pub const fn basic() -> Self {
        Self {
            cross_encoder: 0.6,
            soft_criteria: 0.2,
            distance: 0.2,
        }
    }

    pub const fn enhanced() -> Self {
        Self {
            cross_encoder: 0.3,
            soft_criteria: 0.5,
            distance: 0.2,
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let parts = [self.cross_encoder, self.soft_criteria, self.distance];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::InvalidWeights {
                reason: format!("weights must be finite and non-negative, got {self:?}"),
            });
        }
        if parts.iter().sum::<f32>() <= 0.0 {
            return Err(ScoringError::InvalidWeights {
                reason: "at least one weight must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn combine(&self, ce: f32, soft: f32, distance: f32) -> f32 {
        self.cross_encoder * ce + self.soft_criteria * soft + self.distance * distance
    }
}

#[derive(Debug, Clone, Serialize)]
/// Candidate annotated with its component scores after re-ranking.
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Weighted final score; results are ordered by it.
    pub rerank_score: f32,
    /// Normalized cross-encoder score (`1.0` when the cross-encoder is off).
    pub ce_score: f32,
    pub soft_score: f32,
    /// `1 - normalized distance`.
    pub distance_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_breakdown: Option<Vec<CriterionScore>>,
}

impl ScoredCandidate {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }
}

/// `(min, max - min)` when `values` holds at least two distinct values.
fn spread(values: &[f32]) -> Option<(f32, f32)> {
    let min = values.iter().copied().reduce(f32::min)?;
    let max = values.iter().copied().fold(min, f32::max);
    (max > min).then_some((min, max - min))
}

/// Rescales `values` into `[0, 1]`.
///
/// When every value is equal (including a single value) all become `1.0`.
pub fn min_max_normalize(values: &[f32]) -> Vec<f32> {
    match spread(values) {
        Some((min, range)) => values.iter().map(|v| (v - min) / range).collect(),
        None => vec![1.0; values.len()],
    }
}

/// Cross-encoder scores rescaled into `[0, 1]`; left as-is when all equal.
pub fn normalize_relevance(scores: &[f32]) -> Vec<f32> {
    match spread(scores) {
        Some((min, range)) => scores.iter().map(|s| (s - min) / range).collect(),
        None => scores.to_vec(),
    }
}

/// Closest distance scores `1.0`, farthest `0.0`; all `1.0` when equal.
pub fn distance_scores(distances: &[f32]) -> Vec<f32> {
    match spread(distances) {
        Some((min, range)) => distances.iter().map(|d| 1.0 - (d - min) / range).collect(),
        None => vec![1.0; distances.len()],
    }
}
