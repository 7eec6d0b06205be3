//! Scout library crate (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`SearchPipeline`], [`PipelineOptions`], [`SearchResult`] - embed, retrieve, re-rank
//! - [`Config`], [`ConfigError`] - environment configuration
//! - [`QueryConfig`] - YAML query definitions
//!
//! ## Retrieval
//! - [`Embedder`] with [`VoyageEmbedder`] and [`StubEmbedder`]
//! - [`CandidateStore`] with [`QdrantStore`] and [`TurbopufferStore`]
//! - [`FilterExpr`] - store-neutral filters built from hard criteria
//!
//! ## Scoring
//! - [`CandidateReranker`], [`ScoreWeights`], [`RerankStrategy`]
//! - [`Reranker`] - BERT cross-encoder (or keyword stub)
//!
//! ## Evaluation
//! - [`EvaluationClient`], [`Evaluator`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod criteria;
pub mod embedding;
pub mod evaluation;
pub mod filter;
pub mod pipeline;
pub mod query;
pub mod scoring;
pub mod vectordb;

pub use candidate::{Candidate, CandidateAttributes, DEFAULT_ATTRIBUTES};
pub use config::{Config, ConfigError};
pub use criteria::{CriterionScore, SoftScore, extract_keywords, passes_hard_criteria};
pub use embedding::{
    Embedder, EmbeddingError, RelevanceScorer, Reranker, RerankerConfig, RerankerError,
    StubEmbedder, VoyageConfig, VoyageEmbedder,
};
pub use evaluation::{
    EvaluationClient, EvaluationConfig, EvaluationError, EvaluationResponse, Evaluator,
};
pub use filter::{FilterExpr, filter_from_hard_criteria};
pub use pipeline::{
    DEFAULT_BATCH_CONCURRENCY, PipelineError, PipelineOptions, QueryEvaluation, SearchPipeline,
    SearchResult,
};
pub use query::{QueryConfig, QueryConfigError, config_file_name, discover_configs};
pub use scoring::{
    CandidateReranker, RerankStrategy, ScoreWeights, ScoredCandidate, ScoringError,
    distance_scores, min_max_normalize, normalize_relevance,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockCandidateStore;
pub use vectordb::{
    CandidateStore, QdrantStore, TurbopufferConfig, TurbopufferStore, VectorBackend,
    VectorDbError,
};
