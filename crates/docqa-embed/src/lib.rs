use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use docqa_core::config::{expand_path, EmbeddingConfig};
use docqa_core::traits::Embedder;

mod device;
mod lazy;
mod pool;
mod tokenize;

pub use device::select_device;
pub use lazy::LazyEmbedder;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

/// Sentence-embedding model (all-MiniLM-L6-v2 layout: BERT encoder, mean
/// pooling, L2 normalization).
pub struct EmbeddingModel { model: BertModel, tokenizer: Tokenizer, device: Device, id: String, dim: usize, max_len: usize }

impl EmbeddingModel {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let device = select_device();
        let model_dir = resolve_model_dir(config.model_dir.as_deref())?;
        info!(dir = %model_dir.display(), "loading sentence embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let bert_config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?,
        )?;
        let weights = load_weights(&model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &bert_config)?;
        let dim = bert_config.hidden_size;
        if dim != config.dimension {
            bail!("model at {} produces {}-d vectors but embedding.dimension is {}", model_dir.display(), dim, config.dimension);
        }
        let name = model_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "bert".to_string());
        info!(model = %name, dim, "embedding model loaded");
        Ok(Self { model, tokenizer, device, id: format!("bert:{name}:d{dim}"), dim, max_len: config.max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        if emb.len() != self.dim { bail!("model returned {} values, expected {}", emb.len(), self.dim); }
        if start.elapsed().as_millis() > 100 { debug!(ms = start.elapsed().as_millis() as u64, "slow embedding"); }
        Ok(emb)
    }
}

impl Embedder for EmbeddingModel {
    fn model_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Deterministic hashing embedder. Shares vocabulary-level similarity
/// between texts with common words; needs no model files.
pub struct FakeEmbedder { dim: usize, id: String }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("fake:d{dim}") } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher}; use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        let tokens = text.split_whitespace().map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()).filter(|t| !t.is_empty());
        for (i, token) in tokens.enumerate() { let mut hasher = XxHash64::with_seed(0); token.hash(&mut hasher); let h = hasher.finish(); let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32); v[idx] += val + (i as f32 % 3.0) * 0.01; }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6); for x in &mut v { *x /= norm; } v
    }
}

impl Embedder for FakeEmbedder {
    fn model_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}

pub fn fake_embeddings_requested(config: &EmbeddingConfig) -> bool {
    config.use_fake || std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn get_default_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    if fake_embeddings_requested(config) { info!("using FakeEmbedder"); return Ok(Box::new(FakeEmbedder::new(config.dimension))); }
    Ok(Box::new(EmbeddingModel::new(config)?))
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        return Ok(candle_core::pickle::read_all(&pickle)?.into_iter().collect());
    }
    bail!("no model.safetensors or pytorch_model.bin in {}", model_dir.display())
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured { let p = expand_path(dir); if p.exists() { return Ok(p); } warn!(dir, "configured embedding.model_dir does not exist"); }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = expand_path(&dir); if p.exists() { debug!(dir = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    let root = Path::new("../models/all-MiniLM-L6-v2"); if root.exists() { return Ok(root.to_path_buf()); }
    let local = Path::new("models/all-MiniLM-L6-v2"); if local.exists() { return Ok(local.to_path_buf()); }
    Err(anyhow!("Could not locate the all-MiniLM-L6-v2 model directory (set embedding.model_dir or MODEL_DIR)"))
}
