//! Bounded search history, most recent first.
//!
//! New entries go to the front; once the buffer holds more than `capacity`
//! entries the oldest ones fall off the back. Entries are never edited.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::types::SearchHistoryEntry;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<SearchHistoryEntry>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SearchHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>, source: impl Into<String>) {
        self.record_at(question, answer, source, Utc::now());
    }

    pub fn record_at(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.entries.push_front(SearchHistoryEntry {
            question: question.into(),
            answer: answer.into(),
            source_filename: source.into(),
            timestamp,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list(&self) -> Vec<SearchHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
