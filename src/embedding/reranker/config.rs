use std::path::PathBuf;

/// Cross-encoder context window (query + document tokens).
pub const MAX_SEQ_LEN: usize = 512;

/// Pairs scored per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone)]
/// Configuration for the cross-encoder [`Reranker`](super::Reranker).
pub struct RerankerConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` runs the keyword-overlap stub.
    pub model_path: Option<PathBuf>,

    /// Squash logits through a sigmoid so scores land in `(0, 1)`.
    pub apply_sigmoid: bool,

    pub max_seq_len: usize,

    pub batch_size: usize,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            apply_sigmoid: true,
            max_seq_len: MAX_SEQ_LEN,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RerankerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        self.batch_size = batch_size;
        self
    }

    pub fn with_sigmoid(mut self, apply: bool) -> Self {
        self.apply_sigmoid = apply;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }

        if self.max_seq_len == 0 {
            return Err("max_seq_len must be positive".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }
}
