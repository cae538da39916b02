//! Embedder that builds its backend on first use.
//!
//! Model construction is expensive, so it is deferred until the first
//! embedding call and then reused. Concurrent first callers are serialized
//! on a mutex so the factory runs at most once per successful
//! initialization; a failed attempt is not cached and the next call retries.
//!
//! The model id is fixed at construction and does not change once the
//! backend is built, so vectors cached before and after initialization
//! share one key.

use anyhow::{anyhow, bail, Result};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::info;

use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;

type Factory = Box<dyn Fn() -> Result<Box<dyn Embedder>> + Send + Sync>;

pub struct LazyEmbedder {
    factory: Factory,
    cell: OnceLock<Arc<dyn Embedder>>,
    init_lock: Mutex<()>,
    id: String,
    dim: usize,
    max_len: usize,
}

impl LazyEmbedder {
    /// `dim` and `max_len` are promised up front; the built backend must match `dim`.
    pub fn new<F>(dim: usize, max_len: usize, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Embedder>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            id: format!("lazy:d{dim}"),
            dim,
            max_len,
        }
    }

    pub fn with_model_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// The fake-vs-real choice is made here, once, so the id always names
    /// the backend that will be built.
    pub fn from_config(mut config: EmbeddingConfig) -> Self {
        config.use_fake = crate::fake_embeddings_requested(&config);
        let id = configured_model_id(&config);
        let (dim, max_len) = (config.dimension, config.max_len);
        Self::new(dim, max_len, move || crate::get_default_embedder(&config)).with_model_id(id)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Id reported by the built backend, if it has been built.
    pub fn backend_id(&self) -> Option<&str> {
        self.cell.get().map(|inner| inner.model_id())
    }

    fn get(&self) -> Result<&Arc<dyn Embedder>> {
        if let Some(inner) = self.cell.get() {
            return Ok(inner);
        }
        let _guard = self.init_lock.lock().map_err(|_| anyhow!("embedder init lock poisoned"))?;
        if let Some(inner) = self.cell.get() {
            return Ok(inner);
        }
        let inner: Arc<dyn Embedder> = Arc::from((self.factory)()?);
        if inner.dim() != self.dim {
            bail!("embedder {} has dimension {}, expected {}", inner.model_id(), inner.dim(), self.dim);
        }
        info!(model = %self.id, backend = inner.model_id(), "embedder initialized");
        Ok(self.cell.get_or_init(|| inner))
    }
}

impl Embedder for LazyEmbedder {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize { self.dim }

    fn max_len(&self) -> usize { self.max_len }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.get()?.embed_batch(texts)
    }
}

fn configured_model_id(config: &EmbeddingConfig) -> String {
    if config.use_fake {
        return format!("fake:d{}", config.dimension);
    }
    let name = config
        .model_dir
        .as_deref()
        .and_then(|dir| std::path::Path::new(dir).file_name())
        .map_or_else(|| "all-MiniLM-L6-v2".to_string(), |n| n.to_string_lossy().to_string());
    format!("bert:{name}:d{}", config.dimension)
}
