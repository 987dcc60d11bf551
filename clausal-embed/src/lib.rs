//! # clausal-embed
//!
//! Text embedding for the clausal retrieval pipeline, backed by a local ONNX
//! sentence-embedding model via FastEmbed. Document chunks and queries are
//! embedded by the same model instance so their vector spaces stay
//! comparable.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clausal_embed::{EmbeddingProvider, FastEmbedProvider};
//!
//! # async fn example() -> clausal_embed::Result<()> {
//! let provider = FastEmbedProvider::create().await?;
//!
//! let chunks = vec!["Clause A: free.".to_string(), "Clause B: up to $500.".to_string()];
//! let result = provider.embed_texts(&chunks).await?;
//! println!("{} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design notes
//!
//! - Model load is a one-time, slow initialization; loaded models are cached
//!   globally so repeated provider construction is cheap.
//! - Embedding calls are order-preserving: output vector `i` corresponds to
//!   input string `i`.
//! - Vectors are plain f32 and are NOT normalized, because the retrieval
//!   index ranks by raw Euclidean distance.
//! - The [`EmbeddingProvider`] trait is the seam for tests: retrieval logic
//!   runs against deterministic stubs instead of a live model.

pub mod error;
pub mod provider;

pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, FastEmbedProvider};
