//! Orchestration of chunk → embed → index → search for one document.

use crate::error::{Result, RetrieverError};
use crate::index::FlatIndex;
use clausal_context::{Chunk, ChunkConfig};
use clausal_embed::EmbeddingProvider;
use serde::Serialize;

/// One retrieved chunk with its distance to the query (closer = more
/// relevant).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Position of the chunk within the document.
    pub sequence: usize,
    /// The chunk text.
    pub text: String,
    /// Euclidean distance between the chunk and the query embedding.
    pub distance: f32,
}

/// Retrieves the chunks of one document most similar to a question.
///
/// `add_document` runs the full chunk → embed → build pipeline and replaces
/// whatever was indexed before. `search` only re-embeds the question and
/// searches the existing index.
#[derive(Debug)]
pub struct DocumentRetriever<P> {
    provider: P,
    config: ChunkConfig,
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

impl<P: EmbeddingProvider> DocumentRetriever<P> {
    /// Create a retriever with the default chunking parameters.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ChunkConfig::default())
    }

    /// Create a retriever with explicit chunking parameters.
    pub fn with_config(provider: P, config: ChunkConfig) -> Self {
        Self {
            provider,
            config,
            chunks: Vec::new(),
            index: FlatIndex::new(),
        }
    }

    /// Chunk `text`, embed every chunk, and rebuild the index from scratch.
    /// Returns the number of indexed chunks.
    pub async fn add_document(&mut self, text: &str) -> Result<usize> {
        self.clear();

        let chunks = self.config.chunk_text(text);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.provider.embed_texts(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RetrieverError::EmbeddingCountMismatch {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }
        tracing::info!(
            "Indexed document: {} chunks, dimension {}",
            chunks.len(),
            embeddings.dimension
        );

        self.index.build(embeddings.embeddings)?;
        self.chunks = chunks;
        Ok(self.chunks.len())
    }

    /// Embed `question` and return the `top_k` closest chunks, ordered by
    /// ascending distance. Returns an empty list when no document is indexed.
    pub async fn search(&self, question: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.provider.embed_text(question).await?;
        let neighbors = self.index.search(&query, top_k)?;

        Ok(neighbors
            .into_iter()
            .map(|(position, distance)| SearchHit {
                sequence: self.chunks[position].sequence,
                text: self.chunks[position].text.clone(),
                distance,
            })
            .collect())
    }

    /// Drop the indexed document, if any.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.index.clear();
    }

    /// Returns `true` once a document has been indexed.
    pub fn is_loaded(&self) -> bool {
        !self.index.is_empty()
    }

    /// Number of indexed chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The chunking parameters in use.
    pub fn config(&self) -> ChunkConfig {
        self.config
    }

    /// Access the embedding provider (shared between documents and queries).
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
