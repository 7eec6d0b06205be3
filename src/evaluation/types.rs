use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body of `POST /evaluate`.
pub struct EvaluationRequest {
    /// Config file name, e.g. `tax_lawyer.yml`.
    pub config_path: String,
    /// Candidate ids in ranked order.
    pub object_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardCriterionResult {
    pub criteria_name: String,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftCriterionResult {
    pub criteria_name: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Scores reported by the evaluation API.
pub struct EvaluationResponse {
    #[serde(default)]
    pub average_final_score: f64,
    #[serde(default)]
    pub num_candidates: usize,
    #[serde(default)]
    pub average_hard_scores: Vec<HardCriterionResult>,
    #[serde(default)]
    pub average_soft_scores: Vec<SoftCriterionResult>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationResponse {
    /// Mean hard-criteria pass rate, `None` without hard criteria.
    pub fn mean_pass_rate(&self) -> Option<f64> {
        if self.average_hard_scores.is_empty() {
            return None;
        }
        let total: f64 = self.average_hard_scores.iter().map(|h| h.pass_rate).sum();
        Some(total / self.average_hard_scores.len() as f64)
    }
}

impl std::fmt::Display for EvaluationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "final score {:.4} over {} candidates",
            self.average_final_score, self.num_candidates
        )?;
        for hard in &self.average_hard_scores {
            write!(f, "\n  hard {}: {:.2}", hard.criteria_name, hard.pass_rate)?;
        }
        for soft in &self.average_soft_scores {
            write!(f, "\n  soft {}: {:.2}", soft.criteria_name, soft.average_score)?;
        }
        Ok(())
    }
}
