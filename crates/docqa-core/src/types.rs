//! Domain types shared by the chunker, the index and the answer pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Separator between a filename and the chunk position in a chunk id.
pub const CHUNK_ID_MARKER: &str = "_chunk_";

/// Collection used when the caller does not ask for another one.
pub const DEFAULT_COLLECTION: &str = "documents";

/// A converted source document.
///
/// - `id`: stable document identity (file stem or caller-provided id)
/// - `filename`: original file name, used to derive chunk ids
/// - `raw_text`: normalized text produced by the format converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub raw_text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, filename: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self { id: id.into(), filename: filename.into(), raw_text: raw_text.into() }
    }

    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }
}

/// A chunk of a document that is independently embedded and retrieved.
///
/// `size` is the length of `text` in chars. `sequence_index` is the
/// position within the parent document, contiguous from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub document_id: String,
    pub filename: String,
    pub sequence_index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
    pub size: usize,
}

impl Chunk {
    pub fn new(document: &Document, sequence_index: usize, text: String, embedding: Vec<f32>) -> Self {
        Self {
            id: chunk_id(&document.filename, sequence_index),
            document_id: document.id.clone(),
            filename: document.filename.clone(),
            sequence_index,
            size: text.chars().count(),
            text,
            embedding,
        }
    }
}

pub fn chunk_id(filename: &str, sequence_index: usize) -> ChunkId {
    format!("{filename}{CHUNK_ID_MARKER}{sequence_index}")
}

/// Nearest neighbours of one query, closest first.
///
/// `distances[i]` belongs to `chunks[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub chunks: Vec<Chunk>,
    pub distances: Vec<f32>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Smallest finite distance, if any.
    pub fn best_distance(&self) -> Option<f32> {
        self.distances.iter().copied().filter(|d| d.is_finite()).reduce(f32::min)
    }
}

/// Distance used by a vector index. Smaller is always closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared euclidean distance. On unit vectors this is `2 - 2 * cos`.
    #[default]
    SquaredL2,
    /// `1 - cosine similarity`.
    Cosine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub question: String,
    pub answer: String,
    pub source_filename: String,
    pub timestamp: DateTime<Utc>,
}

/// Prompt flavour picked by the caller. Never affects retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub style: String,
    pub tone: String,
    pub context: String,
}

impl Default for Personality {
    fn default() -> Self {
        Self::new("formal and precise", "professional", "focusing on accuracy and clarity")
    }
}

impl Personality {
    pub fn new(style: impl Into<String>, tone: impl Into<String>, context: impl Into<String>) -> Self {
        Self { style: style.into(), tone: tone.into(), context: context.into() }
    }

    /// Named presets: `helpful`, `friendly`, `expert`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "helpful" => Some(Self::new(
                "clear and informative",
                "professional",
                "focusing on accurate and useful answers",
            )),
            "friendly" => Some(Self::new(
                "warm and conversational",
                "friendly",
                "using simple explanations",
            )),
            "expert" => Some(Self::new(
                "detailed and technical",
                "expert",
                "providing in-depth analysis and insights",
            )),
            "default" => Some(Self::default()),
            _ => None,
        }
    }
}

/// What `ask` hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub source: String,
}

impl Answer {
    pub const NO_INFORMATION: &'static str = "I don't have information about that topic.";
    pub const NO_SOURCE: &'static str = "No source";

    pub fn no_information() -> Self {
        Self { answer: Self::NO_INFORMATION.to_string(), source: Self::NO_SOURCE.to_string() }
    }

    pub fn is_no_information(&self) -> bool {
        self.answer == Self::NO_INFORMATION && self.source == Self::NO_SOURCE
    }
}
