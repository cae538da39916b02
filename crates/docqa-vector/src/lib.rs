//! In-memory vector index for document chunks.
//!
//! - [`VectorStore`]: named collections of chunks with exact k-NN search
//! - [`EmbeddingIndex`]: the store plus the embedder and an embedding cache

pub mod cache;
pub mod collection;
pub mod distance;
pub mod index;
pub mod store;

pub use cache::{content_hash, CacheStats, EmbeddingCache};
pub use collection::Collection;
pub use index::EmbeddingIndex;
pub use store::{CollectionInfo, SharedCollection, VectorStore};
