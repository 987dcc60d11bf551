//! # clausal-answer
//!
//! The LLM-backed half of the pipeline: turns a question plus retrieved
//! policy clauses into either a free-form explanation or a structured
//! approval/denial decision.
//!
//! The external model is reached through the [`TextGenerator`] trait
//! ("generate text given a prompt"), so the decision and explanation logic
//! can be tested against a deterministic stub instead of a live network
//! service. [`GeminiClient`] is the production implementation.
//!
//! Every public operation here returns a normal value whose shape signals
//! success or failure: a missing API key or a malformed model response comes
//! back as an error-shaped [`Decision`] or a sentinel-prefixed answer string,
//! never as an unhandled fault.

pub mod decision;
pub mod error;
pub mod explain;
pub mod gemini;
pub mod generator;
pub mod query;
pub mod summary;

pub use decision::{Decision, evaluate_decision};
pub use error::{AnswerError, Result};
pub use explain::{Explanation, explain};
pub use gemini::{GeminiClient, ModelInfo};
pub use generator::{GeneratedText, TextGenerator};
pub use query::{ParsedQuery, parse_query};
pub use summary::{Summary, summarize};

/// Sentinel rendered wherever an operation needs a configured LLM and the
/// `GOOGLE_API_KEY` credential is absent.
pub const MISSING_KEY_SENTINEL: &str = "[Google API key not set]";

/// Join retrieved `(clause text, distance)` pairs into the prompt context
/// block shared by the decision and explanation prompts.
pub(crate) fn clause_context(retrieved: &[(String, f32)]) -> String {
    retrieved
        .iter()
        .map(|(clause, _)| format!("Clause: {clause}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
