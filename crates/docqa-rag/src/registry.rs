use std::collections::{HashMap, HashSet};

use docqa_core::types::Document;
use docqa_core::{Error, Result};

/// Documents currently stored, per collection, in ingestion order. This is
/// what a rebuild re-adds.
///
/// An id is reserved before its chunks are embedded and committed once they
/// are stored, so two ingests of the same id cannot both get through.
#[derive(Debug, Default)]
pub(crate) struct DocumentRegistry {
    by_collection: HashMap<String, Vec<Document>>,
    pending: HashSet<(String, String)>,
}

impl DocumentRegistry {
    pub(crate) fn contains(&self, collection: &str, document_id: &str) -> bool {
        self.is_pending(collection, document_id)
            || self.by_collection.get(collection).is_some_and(|docs| docs.iter().any(|d| d.id == document_id))
    }

    pub(crate) fn reserve(&mut self, collection: &str, document_id: &str) -> Result<()> {
        if self.contains(collection, document_id) {
            return Err(Error::DuplicateId { collection: collection.to_string(), id: document_id.to_string() });
        }
        self.pending.insert((collection.to_string(), document_id.to_string()));
        Ok(())
    }

    pub(crate) fn release(&mut self, collection: &str, document_id: &str) {
        self.pending.remove(&(collection.to_string(), document_id.to_string()));
    }

    pub(crate) fn commit(&mut self, collection: &str, document: Document) {
        self.release(collection, &document.id);
        self.by_collection.entry(collection.to_string()).or_default().push(document);
    }

    /// Forgets every entry registered under `document_id`.
    pub(crate) fn remove(&mut self, collection: &str, document_id: &str) -> usize {
        let Some(docs) = self.by_collection.get_mut(collection) else {
            return 0;
        };
        let before = docs.len();
        docs.retain(|d| d.id != document_id);
        before - docs.len()
    }

    pub(crate) fn clear(&mut self, collection: &str) -> Vec<Document> {
        self.by_collection.remove(collection).unwrap_or_default()
    }

    pub(crate) fn documents(&self, collection: &str) -> Vec<Document> {
        self.by_collection.get(collection).cloned().unwrap_or_default()
    }

    fn is_pending(&self, collection: &str, document_id: &str) -> bool {
        self.pending.contains(&(collection.to_string(), document_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_id_is_a_duplicate_until_released() {
        let mut registry = DocumentRegistry::default();
        registry.reserve("c", "x").unwrap();
        assert!(registry.contains("c", "x"));
        assert!(matches!(registry.reserve("c", "x"), Err(Error::DuplicateId { .. })));
        assert!(registry.documents("c").is_empty());

        registry.release("c", "x");
        assert!(!registry.contains("c", "x"));
        registry.reserve("c", "x").unwrap();
        registry.commit("c", Document::new("x", "x.txt", "text"));
        assert!(matches!(registry.reserve("c", "x"), Err(Error::DuplicateId { .. })));
        assert_eq!(registry.documents("c").len(), 1);
        assert!(registry.reserve("other", "x").is_ok());
    }

    #[test]
    fn remove_drops_every_entry_with_the_id() {
        let mut registry = DocumentRegistry::default();
        registry.commit("c", Document::new("x", "x1.txt", "one"));
        registry.commit("c", Document::new("y", "y.txt", "two"));
        registry.commit("c", Document::new("x", "x2.txt", "three"));
        assert_eq!(registry.remove("c", "x"), 2);
        assert_eq!(registry.remove("c", "x"), 0);
        assert_eq!(registry.remove("missing", "x"), 0);
        let ids: Vec<String> = registry.documents("c").into_iter().map(|d| d.id).collect();
        assert_eq!(ids, ["y"]);
    }
}
