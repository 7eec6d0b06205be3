//! Voyage AI embeddings over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL};

use super::Embedder;
use super::error::EmbeddingError;

pub const DEFAULT_VOYAGE_URL: &str = "https://api.voyageai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct VoyageConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Expected vector length; responses of any other length are rejected.
    pub dimension: usize,
    pub timeout: Duration,
}

impl std::fmt::Debug for VoyageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoyageConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VoyageConfig {
    pub const ENV_API_KEY: &'static str = "VOYAGE_API_KEY";
    pub const ENV_MODEL: &'static str = "SCOUT_EMBEDDING_MODEL";
    pub const ENV_BASE_URL: &'static str = "SCOUT_VOYAGE_URL";
    pub const ENV_DIMENSION: &'static str = "SCOUT_EMBEDDING_DIM";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_VOYAGE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    /// Reads `VOYAGE_API_KEY` (required) plus optional model, URL and dimension overrides.
    pub fn from_env() -> Result<Self, EmbeddingError> {
        let api_key = std::env::var(Self::ENV_API_KEY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: format!("{} not set", Self::ENV_API_KEY),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(Self::ENV_MODEL)
            && !model.trim().is_empty()
        {
            config.model = model.trim().to_string();
        }
        if let Ok(url) = std::env::var(Self::ENV_BASE_URL)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }
        if let Some(dim) = std::env::var(Self::ENV_DIMENSION)
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.dimension = dim;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.api_key.is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "api_key cannot be empty".to_string(),
            });
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "dimension must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Debug, Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

/// Embedding client for the Voyage `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct VoyageEmbedder {
    http: HttpClient,
    config: VoyageConfig,
}

impl VoyageEmbedder {
    pub fn new(config: VoyageConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &VoyageConfig {
        &self.config
    }

    /// Queries and documents are embedded alike, without a Voyage `input_type`.
    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        debug!(count = texts.len(), model = %self.config.model, "Requesting embeddings");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbedRequest {
                input: texts,
                model: &self.config.model,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Embedding service rejected request");
            return Err(EmbeddingError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbedResponse =
            resp.json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        self.order_by_index(parsed.data, texts.len())
    }

    fn order_by_index(
        &self,
        items: Vec<EmbedItem>,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if items.len() != expected {
            return Err(EmbeddingError::MalformedResponse {
                reason: format!("expected {} embeddings, got {}", expected, items.len()),
            });
        }

        let mut ordered: Vec<Option<Vec<f32>>> = vec![None; expected];
        for item in items {
            if item.embedding.len() != self.config.dimension {
                return Err(EmbeddingError::MalformedResponse {
                    reason: format!(
                        "expected dimension {}, got {}",
                        self.config.dimension,
                        item.embedding.len()
                    ),
                });
            }
            let slot = ordered
                .get_mut(item.index)
                .ok_or_else(|| EmbeddingError::MalformedResponse {
                    reason: format!("index {} out of range", item.index),
                })?;
            *slot = Some(item.embedding);
        }

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| EmbeddingError::MalformedResponse {
                    reason: format!("missing embedding for input {}", i),
                })
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for VoyageEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::MalformedResponse {
            reason: "empty embedding response".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
