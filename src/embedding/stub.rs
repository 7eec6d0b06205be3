use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::{Embedder, normalize};

/// Deterministic offline embedder.
///
/// Vectors are seeded from a BLAKE3 hash of the text, so identical inputs map
/// to identical unit vectors across runs and platforms. Useful for tests and
/// for exercising a store without an embedding API key.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Produces the embedding synchronously.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&hash.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed_bytes);

        let raw = (0..self.dimension)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        normalize(raw)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating stub embedding");
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
