//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SCOUT_*` environment variables.
//! Vendor credentials (`VOYAGE_API_KEY`, `TURBOPUFFER_API_KEY`, `EVAL_EMAIL`)
//! are read by the component configs that need them.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_FINAL_K, DEFAULT_INITIAL_K};
use crate::embedding::RerankerConfig;
use crate::embedding::reranker::DEFAULT_BATCH_SIZE;
use crate::evaluation::DEFAULT_EVALUATION_URL;
use crate::pipeline::PipelineOptions;
use crate::scoring::RerankStrategy;
use crate::vectordb::{
    DEFAULT_COLLECTION_NAME, DEFAULT_NAMESPACE, DEFAULT_QDRANT_URL, DEFAULT_TURBOPUFFER_URL,
    VectorBackend,
};

/// Search configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SCOUT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Vector store to query. Default: turbopuffer.
    pub vector_backend: VectorBackend,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding candidate profiles.
    pub collection: String,

    /// turbopuffer regional endpoint.
    pub turbopuffer_url: String,

    /// turbopuffer namespace holding candidate profiles.
    pub namespace: String,

    /// Path to the cross-encoder model directory (BERT + tokenizer).
    pub reranker_path: Option<PathBuf>,

    /// Pairs per cross-encoder forward pass. Default: `32`.
    pub reranker_batch_size: usize,

    /// Evaluation API base URL.
    pub eval_url: String,

    /// Re-ranking strategy. Default: enhanced.
    pub strategy: RerankStrategy,

    /// Candidates retrieved before re-ranking. Default: `100`.
    pub initial_k: usize,

    /// Candidates returned. Default: `10`.
    pub final_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_backend: VectorBackend::Turbopuffer,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            turbopuffer_url: DEFAULT_TURBOPUFFER_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            reranker_path: None,
            reranker_batch_size: DEFAULT_BATCH_SIZE,
            eval_url: DEFAULT_EVALUATION_URL.to_string(),
            strategy: RerankStrategy::default(),
            initial_k: DEFAULT_INITIAL_K,
            final_k: DEFAULT_FINAL_K,
        }
    }
}

impl Config {
    const ENV_VECTOR_BACKEND: &'static str = "SCOUT_VECTOR_BACKEND";
    const ENV_QDRANT_URL: &'static str = "SCOUT_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "SCOUT_COLLECTION";
    const ENV_TURBOPUFFER_URL: &'static str = "SCOUT_TURBOPUFFER_URL";
    const ENV_NAMESPACE: &'static str = "SCOUT_NAMESPACE";
    const ENV_RERANKER_PATH: &'static str = "SCOUT_RERANKER_PATH";
    const ENV_RERANKER_BATCH_SIZE: &'static str = "SCOUT_RERANKER_BATCH_SIZE";
    const ENV_EVAL_URL: &'static str = "SCOUT_EVAL_URL";
    const ENV_STRATEGY: &'static str = "SCOUT_STRATEGY";
    const ENV_INITIAL_K: &'static str = "SCOUT_INITIAL_K";
    const ENV_FINAL_K: &'static str = "SCOUT_FINAL_K";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let vector_backend = match Self::read_trimmed(Self::ENV_VECTOR_BACKEND) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidBackend { value })?,
            None => defaults.vector_backend,
        };
        let strategy = match Self::read_trimmed(Self::ENV_STRATEGY) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidStrategy { value })?,
            None => defaults.strategy,
        };

        Ok(Self {
            vector_backend,
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            turbopuffer_url: Self::parse_string_from_env(
                Self::ENV_TURBOPUFFER_URL,
                defaults.turbopuffer_url,
            ),
            namespace: Self::parse_string_from_env(Self::ENV_NAMESPACE, defaults.namespace),
            reranker_path: Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH),
            reranker_batch_size: Self::parse_usize_from_env(
                Self::ENV_RERANKER_BATCH_SIZE,
                defaults.reranker_batch_size,
            )?,
            eval_url: Self::parse_string_from_env(Self::ENV_EVAL_URL, defaults.eval_url),
            strategy,
            initial_k: Self::parse_usize_from_env(Self::ENV_INITIAL_K, defaults.initial_k)?,
            final_k: Self::parse_usize_from_env(Self::ENV_FINAL_K, defaults.final_k)?,
        })
    }

    /// Validates paths and retrieval sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.reranker_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.initial_k == 0 || self.final_k == 0 {
            return Err(ConfigError::InvalidK {
                initial_k: self.initial_k,
                final_k: self.final_k,
            });
        }

        if self.reranker_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }

        Ok(())
    }

    /// Cross-encoder settings; no model path runs the keyword-overlap stub.
    pub fn reranker_config(&self) -> RerankerConfig {
        let config = match self.reranker_path {
            Some(ref path) => RerankerConfig::new(path),
            None => RerankerConfig::stub(),
        };
        RerankerConfig {
            batch_size: self.reranker_batch_size,
            ..config
        }
    }

    /// Pipeline options with re-ranking on and the configured strategy and sizes.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            strategy: self.strategy,
            initial_k: self.initial_k,
            final_k: self.final_k,
            ..PipelineOptions::default()
        }
    }

    fn read_trimmed(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::read_trimmed(var_name).map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::read_trimmed(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match Self::read_trimmed(var_name) {
            Some(value) => value.parse().map_err(|e| ConfigError::InvalidNumber {
                name: var_name,
                value,
                source: e,
            }),
            None => Ok(default),
        }
    }
}
