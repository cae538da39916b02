//! In-memory embedding cache keyed by `(content_hash, embedder_id)`.
//!
//! Consulted before calling the embedder and written through on misses, so
//! re-adding unchanged text (for example during a rebuild) costs no model
//! calls.

use std::collections::HashMap;
use std::sync::Mutex;

use docqa_core::{Error, Result};

pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

#[derive(Default)]
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    vectors: HashMap<(String, String), Vec<f32>>,
    hits: usize,
    misses: usize,
}

impl EmbeddingCache {
    pub fn new() -> Self { Self::default() }

    /// Cached vectors for the given hashes; missing hashes are absent from the map.
    pub fn get_many(&self, embedder_id: &str, hashes: &[String]) -> Result<HashMap<String, Vec<f32>>> {
        let mut inner = self.inner.lock().map_err(|_| Error::poisoned("embedding cache"))?;
        let mut out = HashMap::new();
        for h in hashes {
            if let Some(v) = inner.vectors.get(&(h.clone(), embedder_id.to_string())) {
                out.insert(h.clone(), v.clone());
            }
        }
        let hits = hashes.iter().filter(|h| out.contains_key(h.as_str())).count();
        inner.hits += hits;
        inner.misses += hashes.len() - hits;
        Ok(out)
    }

    pub fn put_many(&self, embedder_id: &str, entries: Vec<(String, Vec<f32>)>) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| Error::poisoned("embedding cache"))?;
        for (hash, vector) in entries {
            inner.vectors.insert((hash, embedder_id.to_string()), vector);
        }
        Ok(())
    }

    /// Drops the given hashes; returns how many entries were present.
    pub fn evict<I>(&self, embedder_id: &str, hashes: I) -> Result<usize>
    where
        I: IntoIterator<Item = String>,
    {
        let mut inner = self.inner.lock().map_err(|_| Error::poisoned("embedding cache"))?;
        let mut evicted = 0;
        for hash in hashes {
            if inner.vectors.remove(&(hash, embedder_id.to_string())).is_some() {
                evicted += 1;
            }
        }
        Ok(evicted)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let inner = self.inner.lock().map_err(|_| Error::poisoned("embedding cache"))?;
        Ok(CacheStats { hits: inner.hits, misses: inner.misses, entries: inner.vectors.len() })
    }
}
