use docqa_core::types::Document;
use docqa_core::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedDocument {
    pub document_id: String,
    pub filename: String,
    pub chunks: usize,
}

#[derive(Debug)]
pub struct IngestFailure {
    /// Document id, or the file path when the file could not be read.
    pub name: String,
    pub error: Error,
}

/// Outcome of a batch ingest. One failed document never stops the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub ingested: Vec<IngestedDocument>,
    pub failed: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_chunks(&self) -> usize {
        self.ingested.iter().map(|d| d.chunks).sum()
    }
}

/// Progress events from a batch or directory ingest.
#[derive(Debug, Clone, Copy)]
pub enum IngestProgress<'a> {
    Started { documents: usize },
    Finished { document: &'a Document, stored: bool },
}
