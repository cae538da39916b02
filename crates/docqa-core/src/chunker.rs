//! Recursive character chunker.
//!
//! Splits text on the first separator of `"\n\n"`, `"\n"`, `" "`, `""` that
//! occurs in the region, merges the pieces greedily up to `chunk_size` chars
//! and carries at most `chunk_overlap` chars from the end of one chunk into
//! the next. Pieces that are still too long are split again with the
//! separators that follow. Lengths are counted in chars.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{Error, Result};

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 700, chunk_overlap: 100 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Split `text` into overlapping chunks. Empty or whitespace-only input
    /// yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.config.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if finer.is_empty() {
                if let Some(chunk) = join_trimmed([piece]) {
                    chunks.push(chunk);
                }
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }
        chunks
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let ChunkingConfig { chunk_size, chunk_overlap } = self.config;
        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > chunk_size && !window.is_empty() {
                if let Some(chunk) = join_trimmed(window.iter().copied()) {
                    merged.push(chunk);
                }
                // Keep the tail as overlap, and make room for the next piece.
                while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                    let Some(front) = window.pop_front() else { break };
                    total -= char_len(front);
                }
            }
            window.push_back(piece);
            total += len;
        }
        if let Some(chunk) = join_trimmed(window.iter().copied()) {
            merged.push(chunk);
        }
        merged
    }
}

/// Split on `separator`, attaching each separator to the start of the piece
/// that follows it. An empty separator splits into single chars.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect();
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join_trimmed<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let joined: String = pieces.into_iter().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
