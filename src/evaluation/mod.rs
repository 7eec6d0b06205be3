//! Client for the candidate evaluation API.
//!
//! The API grades up to [`MAX_EVALUATION_IDS`](crate::constants::MAX_EVALUATION_IDS)
//! ranked candidate ids against a named query config.

pub mod client;
mod error;
pub mod types;


use async_trait::async_trait;

pub use client::{DEFAULT_EVALUATION_URL, EvaluationClient, EvaluationConfig};
pub use error::EvaluationError;
pub use types::{EvaluationRequest, EvaluationResponse, HardCriterionResult, SoftCriterionResult};

/// Grades ranked candidate ids for a query config.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// `config_path` is the config's file name, not a filesystem path.
    async fn evaluate(
        &self,
        config_path: &str,
        object_ids: Vec<String>,
    ) -> Result<EvaluationResponse, EvaluationError>;

    /// Submits the first `top_k` of `ranked_ids`.
    async fn evaluate_results(
        &self,
        config_path: &str,
        mut ranked_ids: Vec<String>,
        top_k: usize,
    ) -> Result<EvaluationResponse, EvaluationError> {
        ranked_ids.truncate(top_k);
        self.evaluate(config_path, ranked_ids).await
    }
}
