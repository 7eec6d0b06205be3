use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::evaluation::EvaluationError;
use crate::query::QueryConfigError;
use crate::scoring::ScoringError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval failed: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("re-ranking failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    QueryConfig(#[from] QueryConfigError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("no evaluator configured")]
    NoEvaluator,

    #[error("no results to evaluate for {config}")]
    NoResults { config: String },

    #[error("re-ranking task failed: {reason}")]
    TaskFailed { reason: String },
}
