//! BERT sequence-classification head for cross-encoder checkpoints.
//!
//! Matches the HuggingFace `BertForSequenceClassification` layout used by the
//! `ms-marco` cross-encoders: encoder, optional tanh pooler over `[CLS]`, and a
//! single-logit linear classifier.

use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};

struct CrossEncoderHead {
    bert: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
}

impl CrossEncoderHead {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let prefix = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            Some("bert")
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            Some("roberta")
        } else {
            None
        };

        let encoder_vb = match prefix {
            Some(p) => vb.pp(p),
            None => vb.clone(),
        };
        let bert = BertModel::load(encoder_vb.clone(), config)?;

        let hidden = config.hidden_size;
        let pooler = if encoder_vb.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(hidden, hidden, encoder_vb.pp("pooler.dense"))?)
        } else {
            None
        };
        let classifier = candle_nn::linear(hidden, 1, vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls = hidden.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls)?.tanh()?,
            None => cls,
        };
        self.classifier.forward(&pooled)
    }
}

#[derive(Clone)]
/// Shared handle to a loaded cross-encoder.
pub struct BertCrossEncoder(Arc<CrossEncoderHead>);

impl BertCrossEncoder {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle_core::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights = model_dir.join("model.safetensors");
        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)? };

        Ok(Self(Arc::new(CrossEncoderHead::load(vb, &config)?)))
    }

    /// Returns one logit per row, shape `(batch, 1)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
