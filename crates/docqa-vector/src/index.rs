//! Embedding index: embeds text with the shared embedder and stores or
//! searches the resulting vectors in a [`VectorStore`].

use std::sync::Arc;

use tracing::{debug, warn};

use docqa_core::traits::Embedder;
use docqa_core::types::{Chunk, DistanceMetric, QueryResult};
use docqa_core::{Error, Result};

use crate::cache::{content_hash, CacheStats, EmbeddingCache};
use crate::store::{CollectionInfo, VectorStore};

pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
    cache: EmbeddingCache,
}

impl EmbeddingIndex {
    /// The index dimension is taken from the embedder and fixed from then on.
    pub fn new(embedder: Arc<dyn Embedder>, metric: DistanceMetric) -> Self {
        let store = VectorStore::new(embedder.dim(), metric);
        Self { embedder, store, cache: EmbeddingCache::new() }
    }

    pub fn dim(&self) -> usize { self.store.dim() }
    pub fn store(&self) -> &VectorStore { &self.store }
    pub fn embedder_id(&self) -> &str { self.embedder.model_id() }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.embedder.embed(text).map_err(|e| {
            warn!(error = %e, "embedding failed");
            Error::embedding(&e)
        })?;
        self.check_dim(&vector)?;
        Ok(vector)
    }

    /// Embeds a batch, serving unchanged texts from the content-hash cache.
    pub fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embedder_id = self.embedder.model_id().to_string();
        let hashes: Vec<String> = texts.iter().map(|t| content_hash(t)).collect();
        let cached = self.cache.get_many(&embedder_id, &hashes)?;

        let mut vectors: Vec<Option<Vec<f32>>> = hashes.iter().map(|h| cached.get(h).cloned()).collect();
        let miss_indices: Vec<usize> = (0..texts.len()).filter(|&i| vectors[i].is_none()).collect();
        if !miss_indices.is_empty() {
            let miss_texts: Vec<String> = miss_indices.iter().map(|&i| texts[i].clone()).collect();
            let embs = self.embedder.embed_batch(&miss_texts).map_err(|e| {
                warn!(error = %e, batch = miss_texts.len(), "batch embedding failed");
                Error::embedding(&e)
            })?;
            if embs.len() != miss_texts.len() {
                return Err(Error::EmbeddingBackend(format!(
                    "embedder returned {} vectors for {} texts",
                    embs.len(),
                    miss_texts.len()
                )));
            }
            let mut fresh = Vec::with_capacity(embs.len());
            for (&i, v) in miss_indices.iter().zip(embs) {
                self.check_dim(&v)?;
                fresh.push((hashes[i].clone(), v.clone()));
                vectors[i] = Some(v);
            }
            self.cache.put_many(&embedder_id, fresh)?;
        }
        debug!(total = texts.len(), embedded = miss_indices.len(), "embedded batch");
        Ok(vectors.into_iter().flatten().collect())
    }

    pub fn insert(&self, collection: &str, chunk: Chunk) -> Result<()> {
        self.store.insert(collection, chunk)
    }

    pub fn insert_many(&self, collection: &str, chunks: Vec<Chunk>) -> Result<()> {
        self.store.insert_many(collection, chunks)
    }

    /// The `k` chunks closest to `query_text`, closest first. A collection
    /// that is empty or was never written gives an empty result.
    pub fn query(&self, collection: &str, query_text: &str, k: usize) -> Result<QueryResult> {
        if self.store.len(collection)? == 0 {
            debug!(collection, "query against empty collection");
            return Ok(QueryResult::empty());
        }
        let vector = self.embed(query_text)?;
        let result = self.store.query(collection, &vector, k)?;
        debug!(collection, k, hits = result.len(), best = ?result.best_distance(), "query");
        Ok(result)
    }

    /// Empties the collection and drops the cached embeddings of its chunks.
    pub fn reset(&self, collection: &str) -> Result<()> {
        let removed = self.store.reset(collection)?;
        self.evict(collection, &removed)?;
        Ok(())
    }

    /// Empties the collection but keeps cached embeddings, so re-adding the
    /// same texts costs no model calls.
    pub fn empty(&self, collection: &str) -> Result<usize> {
        Ok(self.store.reset(collection)?.len())
    }

    /// Removes the document's chunks and their cached embeddings; returns
    /// the number of chunks removed.
    pub fn delete_document(&self, collection: &str, document_id: &str) -> Result<usize> {
        let removed = self.store.delete_document(collection, document_id)?;
        self.evict(collection, &removed)?;
        Ok(removed.len())
    }

    pub fn len(&self, collection: &str) -> Result<usize> {
        self.store.len(collection)
    }

    pub fn collections(&self) -> Result<Vec<CollectionInfo>> {
        self.store.info()
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }

    fn evict(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let evicted = self.cache.evict(self.embedder.model_id(), chunks.iter().map(|c| content_hash(&c.text)))?;
        debug!(collection, chunks = chunks.len(), evicted, "evicted cached embeddings");
        Ok(())
    }

    fn check_dim(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.dim() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected: self.dim(), got: vector.len() })
        }
    }
}
