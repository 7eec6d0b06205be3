//! Cross-encoder relevance scoring of (query, document) pairs.
//!
//! With a model directory configured this runs a BERT sequence classifier
//! (e.g. `cross-encoder/ms-marco-MiniLM-L-6-v2`). Without one it falls back
//! to a deterministic keyword-overlap stub so the pipeline runs offline.

pub mod config;
pub mod error;


pub use config::{DEFAULT_BATCH_SIZE, MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use crate::criteria::extract_keywords;
use crate::embedding::bert::BertCrossEncoder;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_pair_tokenizer;

/// Anything that can score how relevant each document is to a query.
///
/// Scores are comparable within one call only; callers normalise them.
pub trait RelevanceScorer: Send + Sync {
    fn score_pairs(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError>;
}

struct LoadedModel {
    model: BertCrossEncoder,
    tokenizer: Tokenizer,
}

pub struct Reranker {
    device: Device,
    config: RerankerConfig,
    loaded: Option<LoadedModel>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.loaded.is_some())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for cross-encoder");

        let Some(model_path) = config.model_path.clone() else {
            info!("No cross-encoder model configured, using keyword-overlap stub");
            return Ok(Self {
                device,
                config,
                loaded: None,
            });
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", required, model_path.display()),
                });
            }
        }

        info!(model_path = %model_path.display(), "Loading cross-encoder");

        let model = BertCrossEncoder::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT weights: {}", e),
            }
        })?;

        let tokenizer = load_pair_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(batch_size = config.batch_size, "Cross-encoder loaded");

        Ok(Self {
            device,
            config,
            loaded: Some(LoadedModel { model, tokenizer }),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Scores a single pair.
    pub fn score(&self, query: &str, document: &str) -> Result<f32, RerankerError> {
        let scores = self.score_pairs(query, &[document.to_string()])?;
        Ok(scores.first().copied().unwrap_or_default())
    }

    fn score_batch(
        &self,
        loaded: &LoadedModel,
        query: &str,
        documents: &[String],
    ) -> Result<Vec<f32>, RerankerError> {
        let pairs: Vec<(String, String)> = documents
            .iter()
            .map(|doc| (query.to_string(), doc.clone()))
            .collect();

        let encodings = loaded.tokenizer.encode_batch(pairs, true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input_ids = self.stack(&encodings, Encoding::get_ids)?;
        let type_ids = self.stack(&encodings, Encoding::get_type_ids)?;
        let attention_mask = self.stack(&encodings, Encoding::get_attention_mask)?;

        let logits = loaded
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))?
            .flatten_all()?
            .to_vec1::<f32>()?;

        if self.config.apply_sigmoid {
            Ok(logits.into_iter().map(sigmoid).collect())
        } else {
            Ok(logits)
        }
    }

    fn stack(
        &self,
        encodings: &[Encoding],
        field: fn(&Encoding) -> &[u32],
    ) -> Result<Tensor, RerankerError> {
        let seq_len = encodings.first().map(|e| field(e).len()).unwrap_or(0);
        let flat: Vec<u32> = encodings
            .iter()
            .flat_map(|e| field(e).iter().copied())
            .collect();

        if flat.len() != seq_len * encodings.len() {
            return Err(RerankerError::TokenizationFailed {
                reason: "encodings in batch have different lengths".to_string(),
            });
        }

        Ok(Tensor::from_vec(flat, (encodings.len(), seq_len), &self.device)?)
    }

    /// Keyword recall blended with Jaccard overlap, squashed into `(0, 1)`.
    fn stub_score(query: &str, document: &str) -> f32 {
        let query_terms: HashSet<String> = extract_keywords(query).into_iter().collect();
        let doc_terms: HashSet<String> = extract_keywords(document).into_iter().collect();

        if query_terms.is_empty() {
            return 0.0;
        }

        let overlap = query_terms.intersection(&doc_terms).count() as f32;
        let recall = overlap / query_terms.len() as f32;
        let union = query_terms.union(&doc_terms).count() as f32;
        let jaccard = if union > 0.0 { overlap / union } else { 0.0 };

        sigmoid(8.0 * ((0.6 * recall + 0.4 * jaccard) - 0.5))
    }
}

impl RelevanceScorer for Reranker {
    fn score_pairs(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            query_len = query.len(),
            documents = documents.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring query-document pairs"
        );

        let Some(loaded) = &self.loaded else {
            return Ok(documents
                .iter()
                .map(|doc| Self::stub_score(query, doc))
                .collect());
        };

        let mut scores = Vec::with_capacity(documents.len());
        for chunk in documents.chunks(self.config.batch_size) {
            scores.extend(self.score_batch(loaded, query, chunk)?);
        }
        Ok(scores)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
