use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::Document;

/// Word-count summary over a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_documents: usize,
    pub total_words: usize,
    pub average_words: usize,
    pub min_words: usize,
    pub max_words: usize,
    /// Lower-cased extension (with leading dot, or `""`) -> document count.
    pub by_extension: BTreeMap<String, usize>,
}

impl DocumentStats {
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut stats = Self::default();
        let mut min_words = usize::MAX;
        for doc in documents {
            let words = doc.word_count();
            stats.total_documents += 1;
            stats.total_words += words;
            min_words = min_words.min(words);
            stats.max_words = stats.max_words.max(words);
            *stats.by_extension.entry(extension_of(&doc.filename)).or_insert(0) += 1;
        }
        if stats.total_documents > 0 {
            stats.min_words = min_words;
            stats.average_words = stats.total_words / stats.total_documents;
        }
        stats
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
