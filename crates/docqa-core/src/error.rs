use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Document '{0}' is too small: no text left after chunking")]
    EmptyDocument(String),

    #[error("Duplicate chunk id '{id}' in collection '{collection}'")]
    DuplicateId { collection: String, id: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Embedding backend failed: {0}")]
    EmbeddingBackend(String),

    #[error("Generation backend failed: {0}")]
    GenerationBackend(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Wrap an embedder failure, keeping the whole context chain.
    pub fn embedding(err: &anyhow::Error) -> Self {
        Self::EmbeddingBackend(format!("{err:#}"))
    }

    /// Wrap a generator failure, keeping the whole context chain.
    pub fn generation(err: &anyhow::Error) -> Self {
        Self::GenerationBackend(format!("{err:#}"))
    }

    pub fn poisoned(what: &str) -> Self {
        Self::Operation(format!("{what} lock poisoned"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
