//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("unknown vector backend '{value}' (expected qdrant or turbopuffer)")]
    InvalidBackend { value: String },

    #[error("unknown rerank strategy '{value}' (expected basic or enhanced)")]
    InvalidStrategy { value: String },

    /// Retrieval sizes must be positive.
    #[error("initial_k ({initial_k}) and final_k ({final_k}) must be positive")]
    InvalidK { initial_k: usize, final_k: usize },

    #[error("reranker batch size must be positive")]
    InvalidBatchSize,

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
}
