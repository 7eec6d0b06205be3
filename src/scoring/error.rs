use thiserror::Error;

use crate::embedding::RerankerError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("cross-encoder error: {0}")]
    Reranker(#[from] RerankerError),

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
