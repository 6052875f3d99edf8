//! Error types for sift-index.

/// Errors that can occur during ingestion and retrieval.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// IO error reading source files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider error (propagated, not retried).
    #[error("embedding failed: {0}")]
    Embed(#[from] sift_embed::EmbedError),

    /// PDF text extraction error.
    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Source file exceeds the loader's size limit.
    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    /// Vector dimension does not match the index.
    #[error("vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Bulk insertion called with unequal segment and vector counts.
    #[error("batch length mismatch: {segments} segments, {vectors} vectors")]
    BatchMismatch { segments: usize, vectors: usize },

    /// No usable documents after loading and splitting.
    #[error("no usable documents in corpus")]
    EmptyCorpus,

    /// Retrieval attempted before a successful `initialize()`.
    #[error("retriever not initialized: load documents first by calling initialize()")]
    NotInitialized,

    /// Index persistence error.
    #[error("persistence error: {0}")]
    Persist(#[from] crate::persist::PersistError),
}

/// Result type alias using `RetrievalError`.
pub type Result<T> = std::result::Result<T, RetrievalError>;
