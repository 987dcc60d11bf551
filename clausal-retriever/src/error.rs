//! Error types for retrieval operations.

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrieverError>;

/// Failures while indexing a document or searching it.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    /// The extracted document is too small for meaningful retrieval. This is
    /// a warning to the user, not a fault: the document is simply not
    /// indexed.
    #[error("Document is too short for meaningful retrieval ({length} characters)")]
    DocumentTooShort { length: usize },

    /// A vector's dimension disagreed with the rest of the index.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The embedding provider broke the one-vector-per-input contract.
    #[error("Embedding count mismatch: {expected} chunks but {actual} embeddings")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    /// Invalid chunking parameters.
    #[error(transparent)]
    ChunkConfig(#[from] clausal_context::ChunkConfigError),

    /// The embedding provider failed.
    #[error(transparent)]
    Embed(#[from] clausal_embed::EmbedError),
}
