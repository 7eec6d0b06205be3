//! Query embedding + cross-encoder utilities.
//!
//! - [`Embedder`] turns query text into a vector ([`VoyageEmbedder`] over HTTP,
//!   [`StubEmbedder`] offline).
//! - [`reranker`] provides the cross-encoder used by [`crate::scoring`].

/// BERT sequence-classification head used by the reranker.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Cross-encoder reranker.
pub mod reranker;
mod stub;
/// Tokenizer loading helpers.
pub mod utils;
pub mod voyage;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use error::EmbeddingError;
pub use reranker::{RelevanceScorer, Reranker, RerankerConfig, RerankerError};
pub use stub::StubEmbedder;
pub use voyage::{VoyageConfig, VoyageEmbedder};

/// Text-to-vector service.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds one search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Length of every returned vector.
    fn dimension(&self) -> usize;
}

pub(crate) fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}
