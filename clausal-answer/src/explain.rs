//! Free-text answers grounded in retrieved clauses.

use crate::generator::TextGenerator;
use crate::{MISSING_KEY_SENTINEL, clause_context};
use serde::Serialize;

/// A clause-grounded answer to a user question.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// The answer text, or an error sentinel when generation was impossible.
    pub answer: String,
    /// The clause texts the answer was grounded in, in retrieval order.
    pub referenced_clauses: Vec<String>,
    /// Opaque provider safety/confidence metadata, when the provider sent any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<serde_json::Value>,
}

impl Explanation {
    /// A failed explanation: the sentinel goes in the answer and no clauses
    /// are referenced.
    fn failed(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            referenced_clauses: Vec::new(),
            confidence: None,
        }
    }
}

fn explain_prompt(question: &str, retrieved: &[(String, f32)]) -> String {
    let context = clause_context(retrieved);
    format!(
        "You are an assistant answering questions about an insurance policy document. Answer the \
         user's question using ONLY the provided clauses. Quote or reference the clauses that \
         support your answer. If the clauses do not contain the answer, say so.\n\n\
         Question: {question}\n\n\
         Relevant Clauses:\n{context}\n"
    )
}

/// Answer `question` in prose using the retrieved clauses as grounding.
///
/// Like decision evaluation this never fails: a missing generator or a
/// generation error is reported through the `answer` field so the caller can
/// render it directly.
pub async fn explain<G: TextGenerator + ?Sized>(
    generator: Option<&G>,
    question: &str,
    retrieved: &[(String, f32)],
) -> Explanation {
    let Some(generator) = generator else {
        return Explanation::failed(MISSING_KEY_SENTINEL);
    };

    let prompt = explain_prompt(question, retrieved);
    match generator.generate(&prompt).await {
        Ok(generated) => Explanation {
            answer: generated.text,
            referenced_clauses: retrieved.iter().map(|(text, _)| text.clone()).collect(),
            confidence: generated.safety_ratings,
        },
        Err(e) => Explanation::failed(format!("[Error from Gemini Pro: {e}]")),
    }
}
