//! One named collection: chunks in insertion order plus an id index.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use docqa_core::types::{Chunk, DistanceMetric, QueryResult};
use docqa_core::{Error, Result};

use crate::distance::distance;

#[derive(Debug)]
pub struct Collection {
    name: String,
    dim: usize,
    metric: DistanceMetric,
    chunks: Vec<Chunk>,
    positions: HashMap<String, usize>,
}

impl Collection {
    pub fn new(name: impl Into<String>, dim: usize, metric: DistanceMetric) -> Self {
        Self { name: name.into(), dim, metric, chunks: Vec::new(), positions: HashMap::new() }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn dim(&self) -> usize { self.dim }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
    pub fn contains(&self, id: &str) -> bool { self.positions.contains_key(id) }
    pub fn get(&self, id: &str) -> Option<&Chunk> { self.positions.get(id).map(|&i| &self.chunks[i]) }
    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    fn check(&self, chunk: &Chunk) -> Result<()> {
        if chunk.embedding.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: chunk.embedding.len() });
        }
        if self.contains(&chunk.id) {
            return Err(self.duplicate(&chunk.id));
        }
        Ok(())
    }

    fn duplicate(&self, id: &str) -> Error {
        Error::DuplicateId { collection: self.name.clone(), id: id.to_string() }
    }

    pub fn insert(&mut self, chunk: Chunk) -> Result<()> {
        self.check(&chunk)?;
        self.positions.insert(chunk.id.clone(), self.chunks.len());
        self.chunks.push(chunk);
        Ok(())
    }

    /// Inserts all chunks or none of them.
    pub fn insert_many(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        let mut seen = HashSet::with_capacity(chunks.len());
        for chunk in &chunks {
            self.check(chunk)?;
            if !seen.insert(chunk.id.as_str()) {
                return Err(self.duplicate(&chunk.id));
            }
        }
        for chunk in chunks {
            self.positions.insert(chunk.id.clone(), self.chunks.len());
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Exact k-NN. Ascending by distance; equal distances keep insertion order.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<QueryResult> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: vector.len() });
        }
        if k == 0 || self.chunks.is_empty() {
            return Ok(QueryResult::empty());
        }
        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, c)| (i, distance(self.metric, vector, &c.embedding)))
            .collect();
        // NaN sorts last so it can never be the best match.
        scored.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        });
        scored.truncate(k);
        let (chunks, distances) = scored.into_iter().map(|(i, d)| (self.chunks[i].clone(), d)).unzip();
        Ok(QueryResult { chunks, distances })
    }

    /// Removes every chunk of `document_id` and hands them back.
    pub fn delete_document(&mut self, document_id: &str) -> Vec<Chunk> {
        let (removed, kept): (Vec<Chunk>, Vec<Chunk>) =
            std::mem::take(&mut self.chunks).into_iter().partition(|c| c.document_id == document_id);
        self.chunks = kept;
        if !removed.is_empty() {
            self.reindex();
        }
        removed
    }

    /// Empties the collection and hands back what it held.
    pub fn clear(&mut self) -> Vec<Chunk> {
        self.positions.clear();
        std::mem::take(&mut self.chunks)
    }

    /// Distinct document ids, in first-insertion order.
    pub fn document_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.chunks
            .iter()
            .filter(|c| seen.insert(c.document_id.as_str()))
            .map(|c| c.document_id.clone())
            .collect()
    }

    fn reindex(&mut self) {
        self.positions = self.chunks.iter().enumerate().map(|(i, c)| (c.id.clone(), i)).collect();
    }
}
