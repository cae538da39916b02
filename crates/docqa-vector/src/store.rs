//! Named collections behind per-collection read/write locks.
//!
//! Collections are created lazily on first write. Reads against a
//! collection that was never written see an empty result instead of an
//! error; `require` is there for callers that want a strict lookup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use docqa_core::types::{Chunk, DistanceMetric, QueryResult};
use docqa_core::{Error, Result};

use crate::collection::Collection;

pub type SharedCollection = Arc<RwLock<Collection>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub chunks: usize,
    pub documents: usize,
}

pub struct VectorStore {
    dim: usize,
    metric: DistanceMetric,
    collections: RwLock<HashMap<String, SharedCollection>>,
}

impl VectorStore {
    pub fn new(dim: usize, metric: DistanceMetric) -> Self {
        Self { dim, metric, collections: RwLock::new(HashMap::new()) }
    }

    pub fn dim(&self) -> usize { self.dim }
    pub fn metric(&self) -> DistanceMetric { self.metric }

    pub fn get(&self, name: &str) -> Result<Option<SharedCollection>> {
        let map = self.collections.read().map_err(|_| Error::poisoned("collection map"))?;
        Ok(map.get(name).cloned())
    }

    pub fn require(&self, name: &str) -> Result<SharedCollection> {
        self.get(name)?.ok_or_else(|| Error::CollectionNotFound(name.to_string()))
    }

    /// Existing collection or a fresh empty one.
    pub fn collection(&self, name: &str) -> Result<SharedCollection> {
        if let Some(existing) = self.get(name)? {
            return Ok(existing);
        }
        let mut map = self.collections.write().map_err(|_| Error::poisoned("collection map"))?;
        let entry = map.entry(name.to_string()).or_insert_with(|| {
            debug!(collection = name, dim = self.dim, "creating collection");
            Arc::new(RwLock::new(Collection::new(name, self.dim, self.metric)))
        });
        Ok(Arc::clone(entry))
    }

    pub fn insert(&self, collection: &str, chunk: Chunk) -> Result<()> {
        let shared = self.collection(collection)?;
        let mut guard = shared.write().map_err(|_| Error::poisoned(collection))?;
        guard.insert(chunk)
    }

    pub fn insert_many(&self, collection: &str, chunks: Vec<Chunk>) -> Result<()> {
        let shared = self.collection(collection)?;
        let mut guard = shared.write().map_err(|_| Error::poisoned(collection))?;
        guard.insert_many(chunks)
    }

    pub fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<QueryResult> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: vector.len() });
        }
        let Some(shared) = self.get(collection)? else {
            return Ok(QueryResult::empty());
        };
        let guard = shared.read().map_err(|_| Error::poisoned(collection))?;
        guard.query(vector, k)
    }

    /// Empties the collection in place and returns the removed chunks. Idempotent.
    pub fn reset(&self, collection: &str) -> Result<Vec<Chunk>> {
        let Some(shared) = self.get(collection)? else {
            return Ok(Vec::new());
        };
        let removed = shared.write().map_err(|_| Error::poisoned(collection))?.clear();
        Ok(removed)
    }

    pub fn delete_document(&self, collection: &str, document_id: &str) -> Result<Vec<Chunk>> {
        let Some(shared) = self.get(collection)? else {
            return Ok(Vec::new());
        };
        let removed = shared.write().map_err(|_| Error::poisoned(collection))?.delete_document(document_id);
        Ok(removed)
    }

    pub fn len(&self, collection: &str) -> Result<usize> {
        match self.get(collection)? {
            Some(shared) => Ok(shared.read().map_err(|_| Error::poisoned(collection))?.len()),
            None => Ok(0),
        }
    }

    pub fn info(&self) -> Result<Vec<CollectionInfo>> {
        let map = self.collections.read().map_err(|_| Error::poisoned("collection map"))?;
        let mut out = Vec::with_capacity(map.len());
        for (name, shared) in map.iter() {
            let guard = shared.read().map_err(|_| Error::poisoned(name))?;
            out.push(CollectionInfo { name: name.clone(), chunks: guard.len(), documents: guard.document_ids().len() });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
