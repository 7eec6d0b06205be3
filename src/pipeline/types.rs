use std::path::PathBuf;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::constants::{DEFAULT_FINAL_K, DEFAULT_INITIAL_K};
use crate::evaluation::EvaluationResponse;
use crate::scoring::{RerankStrategy, ScoredCandidate};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Knobs for one [`SearchPipeline`](super::SearchPipeline).
pub struct PipelineOptions {
    /// Re-rank retrieved candidates. Default: `true`.
    pub use_reranking: bool,
    pub strategy: RerankStrategy,
    /// Include the cross-encoder in re-ranking. Default: `true`.
    pub use_cross_encoder: bool,
    /// Candidates pulled from the store. Default: `100`.
    pub initial_k: usize,
    /// Candidates returned. Default: `10`.
    pub final_k: usize,
    /// Turn hard criteria into a store-side filter when no filter is given.
    /// Default: `false`; hard criteria are then enforced only while re-ranking.
    pub prefilter: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            use_reranking: true,
            strategy: RerankStrategy::default(),
            use_cross_encoder: true,
            initial_k: DEFAULT_INITIAL_K,
            final_k: DEFAULT_FINAL_K,
            prefilter: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
/// One search hit, with scores when it went through re-ranking.
pub enum SearchResult {
    Ranked(ScoredCandidate),
    Retrieved(Candidate),
}

impl SearchResult {
    pub fn id(&self) -> &str {
        &self.candidate().id
    }

    pub fn candidate(&self) -> &Candidate {
        match self {
            SearchResult::Ranked(scored) => &scored.candidate,
            SearchResult::Retrieved(candidate) => candidate,
        }
    }

    pub fn rerank_score(&self) -> Option<f32> {
        match self {
            SearchResult::Ranked(scored) => Some(scored.rerank_score),
            SearchResult::Retrieved(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Search results for one query config and their grades.
pub struct QueryEvaluation {
    pub config_path: PathBuf,
    /// Name the evaluation API knows the config by.
    pub config_name: String,
    pub results: Vec<SearchResult>,
    pub evaluation: EvaluationResponse,
}
