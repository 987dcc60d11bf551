//! Explicit session state: one document, its index, and the question history.

use crate::error::{Result, RetrieverError};
use crate::retriever::{DocumentRetriever, SearchHit};
use clausal_embed::EmbeddingProvider;
use serde::Serialize;

/// Minimum extracted-text length worth indexing. Shorter uploads are
/// reported back as a warning instead of being indexed.
pub const MIN_DOCUMENT_CHARS: usize = 100;

/// The outcome recorded for one question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Free-form explanation text.
    Answer(String),
    /// Structured decision record, stored as its wire JSON.
    Decision(serde_json::Value),
}

/// One question asked during this session, with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub question: String,
    pub outcome: SessionOutcome,
}

/// Owns the document retriever and the chat history for one interaction
/// session.
///
/// The session is the single writer: loading a document rebuilds the index
/// and clears the history, so a fresh upload replaces everything. Questions
/// are answered one at a time against the read-only index.
#[derive(Debug)]
pub struct Session<P> {
    retriever: DocumentRetriever<P>,
    history: Vec<HistoryEntry>,
}

impl<P: EmbeddingProvider> Session<P> {
    /// Create a session around a retriever with no document loaded.
    pub fn new(retriever: DocumentRetriever<P>) -> Self {
        Self {
            retriever,
            history: Vec::new(),
        }
    }

    /// Index a freshly extracted document, discarding any previous document
    /// and the question history.
    ///
    /// Uploads shorter than [`MIN_DOCUMENT_CHARS`] are rejected with
    /// [`RetrieverError::DocumentTooShort`] and leave no document loaded.
    /// The guard lives here rather than in the retriever so retrieval itself
    /// works on documents of any size.
    pub async fn load_document(&mut self, text: &str) -> Result<usize> {
        self.history.clear();

        let length = text.chars().count();
        if length < MIN_DOCUMENT_CHARS {
            self.retriever.clear();
            return Err(RetrieverError::DocumentTooShort { length });
        }
        self.retriever.add_document(text).await
    }

    /// Retrieve the `top_k` chunks most relevant to `question`.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        self.retriever.search(question, top_k).await
    }

    /// Returns `true` once a document is loaded and indexed.
    pub fn document_loaded(&self) -> bool {
        self.retriever.is_loaded()
    }

    /// Record a free-form answer in the history.
    pub fn record_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.history.push(HistoryEntry {
            question: question.into(),
            outcome: SessionOutcome::Answer(answer.into()),
        });
    }

    /// Record a structured decision in the history.
    pub fn record_decision(&mut self, question: impl Into<String>, decision: serde_json::Value) {
        self.history.push(HistoryEntry {
            question: question.into(),
            outcome: SessionOutcome::Decision(decision),
        });
    }

    /// The questions asked so far, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Access the underlying retriever.
    pub fn retriever(&self) -> &DocumentRetriever<P> {
        &self.retriever
    }
}
