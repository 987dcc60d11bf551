//! clausal-retriever: in-memory semantic retrieval over one document
//!
//! This crate ties the chunker and the embedding provider together around a
//! flat, exact nearest-neighbor index:
//!
//! ```text
//! Document text → Chunker → Embedder → FlatIndex (build)
//! Question      → Embedder → FlatIndex (search) → top-k (chunk, distance)
//! ```
//!
//! The index lives for the duration of one uploaded document and is rebuilt
//! in full when the document changes; queries only re-embed the question and
//! re-search. There is exactly one writer, sequential with all readers, so no
//! locking discipline is needed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clausal_embed::FastEmbedProvider;
//! use clausal_retriever::DocumentRetriever;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = FastEmbedProvider::create().await?;
//! let mut retriever = DocumentRetriever::new(provider);
//!
//! retriever.add_document("Clause A: free. Clause B: up to $500.").await?;
//! let hits = retriever.search("Is knee surgery covered?", 5).await?;
//! for hit in hits {
//!     println!("{:.3}  {}", hit.distance, hit.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod index;
pub mod retriever;
pub mod session;

pub use error::{Result, RetrieverError};
pub use index::FlatIndex;
pub use retriever::{DocumentRetriever, SearchHit};
pub use session::{HistoryEntry, MIN_DOCUMENT_CHARS, Session, SessionOutcome};
