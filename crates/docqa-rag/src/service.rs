use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info, warn};

use docqa_answer::{build_generator, Synthesizer};
use docqa_core::chunker::Chunker;
use docqa_core::config::Settings;
use docqa_core::gate::{gate, Decision};
use docqa_core::history::SearchHistory;
use docqa_core::loader::DocumentLoader;
use docqa_core::source::pick_source;
use docqa_core::stats::DocumentStats;
use docqa_core::traits::{Embedder, Generator};
use docqa_core::types::{Answer, Chunk, Document, Personality, QueryResult, SearchHistoryEntry};
use docqa_core::{Error, Result};
use docqa_embed::LazyEmbedder;
use docqa_vector::{CacheStats, CollectionInfo, EmbeddingIndex};

use crate::registry::DocumentRegistry;
use crate::report::{IngestFailure, IngestProgress, IngestReport, IngestedDocument};

pub struct RagService {
    settings: Settings,
    chunker: Chunker,
    index: EmbeddingIndex,
    synthesizer: Synthesizer,
    registry: RwLock<DocumentRegistry>,
    history: Mutex<SearchHistory>,
}

impl RagService {
    pub fn new(settings: Settings, embedder: Arc<dyn Embedder>, generator: Box<dyn Generator>) -> Result<Self> {
        settings.validate()?;
        if embedder.dim() != settings.embedding.dimension {
            return Err(Error::DimensionMismatch { expected: settings.embedding.dimension, got: embedder.dim() });
        }
        let chunker = Chunker::new(settings.chunking.clone())?;
        let index = EmbeddingIndex::new(embedder, settings.retrieval.metric);
        let synthesizer = Synthesizer::new(generator).with_max_new_tokens(settings.generation.max_new_tokens);
        let history = SearchHistory::new(settings.history.capacity);
        info!(
            embedder = index.embedder_id(),
            generator = synthesizer.generator_name(),
            metric = ?settings.retrieval.metric,
            threshold = settings.retrieval.distance_threshold,
            "rag service ready"
        );
        Ok(Self {
            settings,
            chunker,
            index,
            synthesizer,
            registry: RwLock::new(DocumentRegistry::default()),
            history: Mutex::new(history),
        })
    }

    /// Production wiring: lazily loaded embedding model and the configured
    /// generation backend.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let embedder = Arc::new(LazyEmbedder::from_config(settings.embedding.clone()));
        let generator = build_generator(&settings.generation)?;
        Ok(Self::new(settings, embedder, generator)?)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collection named in the settings.
    pub fn default_collection(&self) -> &str {
        &self.settings.collection
    }

    /// Chunk, embed and store one document. Either every chunk is stored or
    /// none is.
    ///
    /// The id is reserved before embedding starts, so a concurrent ingest
    /// of the same id fails with `DuplicateId` instead of racing this one.
    pub fn ingest(&self, collection: &str, document_id: &str, filename: &str, raw_text: &str) -> Result<Vec<Chunk>> {
        self.write_registry()?.reserve(collection, document_id)?;
        let document = Document::new(document_id, filename, raw_text);
        let stored = match self.embed_document(&document) {
            Ok(chunks) => self.commit_document(collection, document, chunks),
            Err(error) => Err(error),
        };
        if stored.is_err() {
            self.write_registry()?.release(collection, document_id);
        }
        stored
    }

    pub fn ingest_document(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        self.ingest(collection, &document.id, &document.filename, &document.raw_text)
    }

    pub fn ingest_batch(&self, collection: &str, documents: &[Document]) -> IngestReport {
        self.ingest_batch_with(collection, documents, |_| {})
    }

    /// Like [`ingest_batch`](Self::ingest_batch), reporting progress to
    /// `on_progress` as each document finishes.
    pub fn ingest_batch_with<F>(&self, collection: &str, documents: &[Document], mut on_progress: F) -> IngestReport
    where
        F: FnMut(IngestProgress<'_>),
    {
        on_progress(IngestProgress::Started { documents: documents.len() });
        let mut report = IngestReport::default();
        for document in documents {
            match self.ingest_document(collection, document) {
                Ok(chunks) => {
                    report.ingested.push(IngestedDocument {
                        document_id: document.id.clone(),
                        filename: document.filename.clone(),
                        chunks: chunks.len(),
                    });
                    on_progress(IngestProgress::Finished { document, stored: true });
                }
                Err(error) => {
                    warn!(collection, document = %document.id, %error, "document not ingested");
                    report.failed.push(IngestFailure { name: document.id.clone(), error });
                    on_progress(IngestProgress::Finished { document, stored: false });
                }
            }
        }
        info!(collection, ingested = report.ingested.len(), failed = report.failed.len(), chunks = report.total_chunks(), "batch ingest finished");
        report
    }

    /// Load every supported text file under `dir` and ingest it. Unreadable
    /// or unsupported files show up as failures in the report.
    pub fn ingest_directory(&self, collection: &str, dir: &Path) -> Result<IngestReport> {
        self.ingest_directory_with(collection, dir, |_| {})
    }

    pub fn ingest_directory_with<F>(&self, collection: &str, dir: &Path, on_progress: F) -> Result<IngestReport>
    where
        F: FnMut(IngestProgress<'_>),
    {
        let loaded = DocumentLoader::new().load_directory(dir)?;
        let mut report = self.ingest_batch_with(collection, &loaded.documents, on_progress);
        for (path, error) in loaded.failures {
            report.failed.push(IngestFailure { name: path.display().to_string(), error });
        }
        Ok(report)
    }

    pub fn retrieve(&self, collection: &str, question: &str) -> Result<QueryResult> {
        self.index.query(collection, question, self.settings.retrieval.top_k)
    }

    /// Answer `question` from the documents in `collection` and record it
    /// in the history.
    ///
    /// When nothing in the collection is close enough the fixed
    /// no-information answer is returned, the generator is not called and
    /// history is not touched. Backend errors are returned as errors.
    pub fn ask(&self, collection: &str, question: &str, personality: &Personality) -> Result<Answer> {
        let answer = self.answer(collection, question, personality)?;
        self.record_answer(question, &answer)?;
        Ok(answer)
    }

    /// [`ask`](Self::ask) without the history write. Callers that may drop
    /// the answer record it themselves with [`record_answer`](Self::record_answer).
    pub fn answer(&self, collection: &str, question: &str, personality: &Personality) -> Result<Answer> {
        let result = self.retrieve(collection, question)?;
        let best = result.best_distance();
        let (chunks, distances) = match gate(result, self.settings.retrieval.distance_threshold) {
            Decision::Usable { chunks, distances } => (chunks, distances),
            Decision::Declined => {
                info!(collection, best = ?best, "question declined");
                return Ok(Answer::no_information());
            }
        };
        let answer = self.synthesizer.synthesize(question, &chunks, personality)?;
        let source = match pick_source(&chunks, &distances) {
            Some((chunk, _)) if !chunk.filename.is_empty() => chunk.filename.clone(),
            Some((_, document_id)) => document_id.to_string(),
            None => Answer::NO_SOURCE.to_string(),
        };
        debug!(collection, source = %source, best = ?best, "answered");
        Ok(Answer { answer, source })
    }

    /// Adds an answered question to the history. Declined questions are
    /// not recorded.
    pub fn record_answer(&self, question: &str, answer: &Answer) -> Result<()> {
        if !answer.is_no_information() {
            self.lock_history()?.record(question, answer.answer.as_str(), answer.source.as_str());
        }
        Ok(())
    }

    /// Remove a document and all its chunks. Returns the number of chunks
    /// removed; unknown documents are a no-op.
    pub fn delete(&self, collection: &str, document_id: &str) -> Result<usize> {
        let mut registry = self.write_registry()?;
        let removed = self.index.delete_document(collection, document_id)?;
        let registered = registry.remove(collection, document_id);
        info!(collection, document = document_id, chunks = removed, registered, "document deleted");
        Ok(removed)
    }

    /// Empty the collection and forget its documents.
    pub fn reset(&self, collection: &str) -> Result<()> {
        let mut registry = self.write_registry()?;
        self.index.reset(collection)?;
        let forgotten = registry.clear(collection);
        info!(collection, documents = forgotten.len(), "collection reset");
        Ok(())
    }

    /// Empty the collection and re-add every registered document. Unchanged
    /// chunk texts come from the embedding cache.
    ///
    /// A document that cannot be re-added is reported as a failure but stays
    /// registered, so the next rebuild tries it again.
    pub fn rebuild(&self, collection: &str) -> Result<IngestReport> {
        let registry = self.write_registry()?;
        let documents = registry.documents(collection);
        let emptied = self.index.empty(collection)?;
        let mut report = IngestReport::default();
        for document in &documents {
            let stored = self.embed_document(document).and_then(|chunks| {
                let count = chunks.len();
                self.index.insert_many(collection, chunks)?;
                Ok(count)
            });
            match stored {
                Ok(chunks) => report.ingested.push(IngestedDocument {
                    document_id: document.id.clone(),
                    filename: document.filename.clone(),
                    chunks,
                }),
                Err(error) => {
                    warn!(collection, document = %document.id, %error, "document not re-added, kept for the next rebuild");
                    report.failed.push(IngestFailure { name: document.id.clone(), error });
                }
            }
        }
        info!(
            collection,
            documents = documents.len(),
            emptied,
            chunks = report.total_chunks(),
            failed = report.failed.len(),
            "collection rebuilt"
        );
        Ok(report)
    }

    pub fn documents(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.read_registry()?.documents(collection))
    }

    pub fn stats(&self, collection: &str) -> Result<DocumentStats> {
        let documents = self.documents(collection)?;
        Ok(DocumentStats::from_documents(&documents))
    }

    pub fn chunk_count(&self, collection: &str) -> Result<usize> {
        self.index.len(collection)
    }

    pub fn collections(&self) -> Result<Vec<CollectionInfo>> {
        self.index.collections()
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.index.cache_stats()
    }

    pub fn history(&self) -> Result<Vec<SearchHistoryEntry>> {
        Ok(self.lock_history()?.list())
    }

    pub fn clear_history(&self) -> Result<()> {
        self.lock_history()?.clear();
        Ok(())
    }

    fn embed_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        let texts = self.chunker.chunk(&document.raw_text);
        if texts.is_empty() {
            return Err(Error::EmptyDocument(document.filename.clone()));
        }
        let vectors = self.index.embed_many(&texts)?;
        Ok(texts
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (text, vector))| Chunk::new(document, i, text, vector))
            .collect())
    }

    /// Stores the chunks and registers the document under one registry lock.
    fn commit_document(&self, collection: &str, document: Document, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut registry = self.write_registry()?;
        self.index.insert_many(collection, chunks.clone())?;
        info!(collection, document = %document.id, chunks = chunks.len(), "document ingested");
        registry.commit(collection, document);
        Ok(chunks)
    }

    fn read_registry(&self) -> Result<std::sync::RwLockReadGuard<'_, DocumentRegistry>> {
        self.registry.read().map_err(|_| Error::poisoned("document registry"))
    }

    fn write_registry(&self) -> Result<std::sync::RwLockWriteGuard<'_, DocumentRegistry>> {
        self.registry.write().map_err(|_| Error::poisoned("document registry"))
    }

    fn lock_history(&self) -> Result<std::sync::MutexGuard<'_, SearchHistory>> {
        self.history.lock().map_err(|_| Error::poisoned("search history"))
    }
}
