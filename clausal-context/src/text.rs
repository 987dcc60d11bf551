//! Fixed-stride overlapping text chunking.
//!
//! Documents are split into chunks of at most `chunk_size` characters, with
//! each successive chunk starting `chunk_size - overlap` characters after the
//! previous chunk's start. The overlap keeps clause boundaries visible to the
//! retriever even when a sentence straddles two chunks.
//!
//! The chunker operates on the raw extracted text: no whitespace or case
//! normalization happens here, and all offsets are in characters so that
//! multi-byte UTF-8 content never splits mid-character.
//!
//! # Example
//!
//! ```
//! use clausal_context::ChunkConfig;
//!
//! let config = ChunkConfig::new(20, 5).unwrap();
//! let chunks = config.chunk_text("Clause A: free. Clause B: up to $500.");
//!
//! assert!(chunks.len() >= 2);
//! // Chunks overlap: each one restates the tail of its predecessor.
//! assert!(chunks[0].text.ends_with(&chunks[1].text[..5]));
//! ```

use serde::Serialize;

/// Default chunk size in characters, matching the retrieval defaults used
/// for policy documents.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap in characters between successive chunks.
pub const DEFAULT_OVERLAP: usize = 200;

/// Error raised for chunking parameters that cannot make forward progress.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkConfigError {
    /// chunk_size must be non-zero, otherwise every chunk would be empty.
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    /// overlap must be strictly smaller than chunk_size, otherwise the walk
    /// over the document never advances.
    #[error("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { chunk_size: usize, overlap: usize },
}

/// Chunking parameters: target chunk length and overlap, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkConfig {
    chunk_size: usize,
    overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// A contiguous substring of a document, the unit of retrieval.
///
/// Chunks are ordered by `sequence` and carry their starting character
/// offset so callers can map a retrieved chunk back into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position of this chunk within the document (0-indexed).
    pub sequence: usize,
    /// Character offset of the chunk's first character in the document.
    pub start: usize,
    /// The chunk's text.
    pub text: String,
}

impl ChunkConfig {
    /// Create a chunking configuration, validating that the walk terminates.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkConfigError> {
        if chunk_size == 0 {
            return Err(ChunkConfigError::ZeroChunkSize);
        }
        if overlap >= chunk_size {
            return Err(ChunkConfigError::OverlapTooLarge {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Target chunk length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between successive chunks in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Number of characters each successive chunk advances by.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Split `text` into overlapping chunks.
    ///
    /// Each chunk covers `[start, start + chunk_size)` in characters, clamped
    /// to the end of the text, and successive starts advance by
    /// [`stride`](Self::stride). Empty input produces no chunks; input no
    /// longer than `chunk_size` produces exactly one. Concatenating the first
    /// chunk with each later chunk minus its leading `overlap` characters
    /// reconstructs the original text.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        // Byte offset of every character, plus a sentinel for the text end,
        // so slicing always lands on a char boundary.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let char_count = boundaries.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        while start < char_count {
            let end = (start + self.chunk_size).min(char_count);
            chunks.push(Chunk {
                sequence: chunks.len(),
                start,
                text: text[boundaries[start]..boundaries[end]].to_string(),
            });
            start += self.stride();
        }
        chunks
    }
}
