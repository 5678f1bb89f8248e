//! Candle-based BERT text encoder.
//!
//! Loads a sentence-transformer checkpoint (config.json + model.safetensors
//! + tokenizer.json) and produces mean-pooled, L2-normalized embeddings.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::info;

use crate::config::{DevicePreference, EmbeddingConfig, HuggingFaceModelConfig, ModelInfo};
use crate::error::{ModelError, ModelResult};
use crate::locator::{verify_model_dir, ModelLocator};
use crate::EmbeddingModel;

/// BERT encoder with mean pooling and L2 normalization.
///
/// The tokenizer and model are mutex-guarded so a shared encoder can be
/// used from multiple threads without external locking.
pub struct BertTextEncoder {
    model_info: ModelInfo,
    model: Mutex<BertModel>,
    tokenizer: Mutex<Tokenizer>,
    device: Device,
}

impl std::fmt::Debug for BertTextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertTextEncoder")
            .field("model_id", &self.model_info.model_id)
            .field("dimension", &self.model_info.dimension)
            .finish()
    }
}

// The model and tokenizer are only touched under their mutexes.
unsafe impl Send for BertTextEncoder {}
unsafe impl Sync for BertTextEncoder {}

impl BertTextEncoder {
    /// Load an encoder from the configured model directory.
    pub fn new(config: &EmbeddingConfig) -> ModelResult<Self> {
        let model_dir = Self::resolve_model_dir(config)?;

        let hf_config = Self::load_hf_config(&model_dir)?;
        if !hf_config.is_supported() {
            return Err(ModelError::InvalidConfig {
                message: format!(
                    "model type `{}` is not supported; expected a BERT checkpoint",
                    hf_config.model_type
                ),
            });
        }

        let dimension = hf_config.hidden_size;
        let max_seq_len = config
            .max_sequence_length
            .min(hf_config.max_position_embeddings);

        info!(
            "Loading embedding model '{}' from {:?} (dim={}, max_seq={})",
            config.model_id, model_dir, dimension, max_seq_len
        );

        let tokenizer = Self::load_tokenizer(&model_dir, max_seq_len)?;
        let device = Self::select_device(config.device)?;
        let model = Self::load_model(&model_dir, &config.model_id, &device)?;

        Ok(Self {
            model_info: ModelInfo::new(&config.model_id, dimension, max_seq_len),
            model: Mutex::new(model),
            tokenizer: Mutex::new(tokenizer),
            device,
        })
    }

    fn resolve_model_dir(config: &EmbeddingConfig) -> ModelResult<PathBuf> {
        match &config.model_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ModelError::ModelNotFound {
                        model_id: config.model_id.clone(),
                        path: dir.clone(),
                    });
                }
                verify_model_dir(dir)?;
                Ok(dir.clone())
            }
            None => ModelLocator::new().embedding_model_dir(config.model_name()),
        }
    }

    fn load_hf_config(model_dir: &Path) -> ModelResult<HuggingFaceModelConfig> {
        let content = std::fs::read_to_string(model_dir.join("config.json"))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn load_tokenizer(model_dir: &Path, max_length: usize) -> ModelResult<Tokenizer> {
        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ModelError::model_load(tokenizer_path.display().to_string(), e.to_string())
        })?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_id: 0,
            pad_token: "[PAD]".to_string(),
            ..Default::default()
        }));

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| {
                ModelError::model_load(tokenizer_path.display().to_string(), e.to_string())
            })?;

        Ok(tokenizer)
    }

    fn select_device(pref: DevicePreference) -> ModelResult<Device> {
        match pref {
            DevicePreference::Auto | DevicePreference::Cpu => Ok(Device::Cpu),
            DevicePreference::Gpu => Err(ModelError::DeviceNotAvailable {
                reason: "this build runs CPU-only inference; set device to 'cpu' or 'auto'"
                    .to_string(),
            }),
        }
    }

    fn load_model(model_dir: &Path, model_id: &str, device: &Device) -> ModelResult<BertModel> {
        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, device)
                .map_err(|e| ModelError::model_load(model_id, e.to_string()))?
        };

        let content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let bert_config: BertConfig = serde_json::from_str(&content)?;
        BertModel::load(vb, &bert_config)
            .map_err(|e| ModelError::model_load(model_id, e.to_string()))
    }

    /// Map a Candle error into an inference failure for this model.
    fn infer_err(&self, e: impl std::fmt::Display) -> ModelError {
        ModelError::embedding_failed(&self.model_info.model_id, e.to_string())
    }

    fn mean_pooling(&self, hidden: &Tensor, mask: &Tensor) -> ModelResult<Tensor> {
        let mask_expanded = mask
            .unsqueeze(2)
            .and_then(|m| m.to_dtype(DType::F32))
            .and_then(|m| m.broadcast_as(hidden.shape()))
            .map_err(|e| self.infer_err(e))?;

        let sum = hidden
            .broadcast_mul(&mask_expanded)
            .and_then(|t| t.sum(1))
            .map_err(|e| self.infer_err(e))?;

        let count = mask_expanded
            .sum(1)
            .and_then(|t| t.clamp(1e-9, f64::MAX))
            .map_err(|e| self.infer_err(e))?;

        sum.broadcast_div(&count).map_err(|e| self.infer_err(e))
    }

    fn l2_normalize(&self, embeddings: &Tensor) -> ModelResult<Tensor> {
        let norm = embeddings
            .sqr()
            .and_then(|t| t.sum_keepdim(1))
            .and_then(|t| t.sqrt())
            .and_then(|t| t.clamp(1e-12, f64::MAX))
            .map_err(|e| self.infer_err(e))?;

        embeddings
            .broadcast_div(&norm)
            .map_err(|e| self.infer_err(e))
    }
}

impl EmbeddingModel for BertTextEncoder {
    fn embed(&self, texts: &[&str]) -> ModelResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let tokenizer = self.tokenizer.lock().map_err(|e| self.infer_err(e))?;
        let inputs: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let encodings = tokenizer
            .encode_batch(inputs, true)
            .map_err(|e| ModelError::Tokenization {
                message: e.to_string(),
            })?;
        drop(tokenizer);

        let batch_size = encodings.len();
        let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

        let token_ids: Vec<u32> = encodings.iter().flat_map(|e| e.get_ids().to_vec()).collect();
        let attention_mask: Vec<u32> = encodings
            .iter()
            .flat_map(|e| e.get_attention_mask().to_vec())
            .collect();

        let token_ids = Tensor::from_vec(token_ids, (batch_size, seq_len), &self.device)
            .map_err(|e| self.infer_err(e))?;
        let attention_mask = Tensor::from_vec(attention_mask, (batch_size, seq_len), &self.device)
            .map_err(|e| self.infer_err(e))?;
        let token_type_ids = token_ids.zeros_like().map_err(|e| self.infer_err(e))?;

        let model = self.model.lock().map_err(|e| self.infer_err(e))?;
        let hidden = model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| self.infer_err(e))?;
        drop(model);

        let pooled = self.mean_pooling(&hidden, &attention_mask)?;
        let normalized = self.l2_normalize(&pooled)?;

        let rows: Vec<Vec<f32>> = normalized.to_vec2::<f32>().map_err(|e| self.infer_err(e))?;
        Ok(rows)
    }

    fn dimension(&self) -> usize {
        self.model_info.dimension
    }

    fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }
}
