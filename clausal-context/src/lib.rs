//! Text chunking for the clausal retrieval pipeline.
pub mod text;

pub use text::{Chunk, ChunkConfig, ChunkConfigError, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
