//! Structured approval/denial decisions backed by the external LLM.

use crate::generator::TextGenerator;
use crate::query::ParsedQuery;
use crate::{MISSING_KEY_SENTINEL, clause_context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::OnceLock;

/// A claim decision as produced by the LLM.
///
/// All four keys are always present on the wire; any key the model omitted is
/// backfilled with JSON null rather than failing, so each field is an
/// untyped [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: Value,
    pub amount: Value,
    pub justification: Value,
    pub referenced_clauses: Value,
}

impl Decision {
    /// The error-shaped decision: `decision` is the "error" sentinel and the
    /// justification carries the human-readable failure detail.
    pub fn error(justification: impl Into<String>) -> Self {
        Self {
            decision: json!("error"),
            amount: json!(0),
            justification: json!(justification.into()),
            referenced_clauses: json!([]),
        }
    }

    /// Returns `true` when this decision signals a failure rather than a
    /// verdict.
    pub fn is_error(&self) -> bool {
        self.decision.as_str() == Some("error")
    }

    /// Build a decision from the model's raw JSON object, backfilling any of
    /// the four required keys with null.
    fn from_raw(raw: &Value) -> Self {
        let field = |key: &str| raw.get(key).cloned().unwrap_or(Value::Null);
        Self {
            decision: field("decision"),
            amount: field("amount"),
            justification: field("justification"),
            referenced_clauses: field("referenced_clauses"),
        }
    }
}

fn fence_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[a-zA-Z]*\s*").expect("static pattern"))
}

fn fence_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```$").expect("static pattern"))
}

/// Remove the Markdown code-fence markers models often wrap JSON in.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let without_open = fence_open_regex().replace(trimmed, "");
    fence_close_regex().replace(&without_open, "").trim().to_string()
}

fn decision_prompt(parsed: &ParsedQuery, retrieved: &[(String, f32)]) -> String {
    let query_json = serde_json::to_string(parsed).unwrap_or_else(|_| "{}".to_string());
    let context = clause_context(retrieved);
    format!(
        "You are an expert insurance policy decision assistant. Given the following user query \
         and extracted entities, and the most relevant policy clauses, make a decision \
         (approved/rejected), payout amount (if any), and provide a justification. Reference the \
         specific clauses used. Return your answer as a JSON object with keys: decision, amount, \
         justification, referenced_clauses (list of clause texts used).\n\n\
         User Query: {query_json}\n\n\
         Relevant Clauses:\n{context}\n\n\
         Respond ONLY with a valid JSON object.\n"
    )
}

/// Produce a [`Decision`] for a parsed query against the retrieved clauses.
///
/// The core logic is delegated to the generator; locally this only builds the
/// deterministic prompt, strips fence markers, parses the JSON, and backfills
/// missing keys. Every failure mode comes back as an error-shaped decision;
/// this function never returns an error:
///
/// - no generator configured (missing credential): justification is the
///   `[Google API key not set]` sentinel;
/// - generator failure: `[Error from Gemini Pro: ...]`;
/// - unparseable output: the raw offending text is embedded for diagnosis.
pub async fn evaluate_decision<G: TextGenerator + ?Sized>(
    generator: Option<&G>,
    parsed: &ParsedQuery,
    retrieved: &[(String, f32)],
) -> Decision {
    let Some(generator) = generator else {
        return Decision::error(MISSING_KEY_SENTINEL);
    };

    let prompt = decision_prompt(parsed, retrieved);
    let generated = match generator.generate(&prompt).await {
        Ok(generated) => generated,
        Err(e) => return Decision::error(format!("[Error from Gemini Pro: {e}]")),
    };

    let cleaned = strip_code_fences(&generated.text);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(raw) if raw.is_object() => Decision::from_raw(&raw),
        _ => {
            tracing::warn!("Model did not return valid JSON for decision");
            Decision::error(format!(
                "LLM did not return valid JSON: {}",
                generated.text.trim()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnswerError;
    use crate::generator::GeneratedText;
    use async_trait::async_trait;

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> crate::Result<GeneratedText> {
            Ok(GeneratedText::new(self.0))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> crate::Result<GeneratedText> {
            Err(AnswerError::EmptyResponse)
        }
    }

    fn retrieved() -> Vec<(String, f32)> {
        vec![
            ("Clause A: free.".to_string(), 0.1),
            ("Clause B: up to $500.".to_string(), 0.4),
        ]
    }

    #[tokio::test]
    async fn test_missing_credential_returns_exact_error_decision() {
        let decision =
            evaluate_decision::<StaticGenerator>(None, &ParsedQuery::default(), &retrieved()).await;

        let wire = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            wire,
            json!({
                "decision": "error",
                "amount": 0,
                "justification": "[Google API key not set]",
                "referenced_clauses": []
            })
        );
    }

    #[tokio::test]
    async fn test_fenced_json_is_stripped_and_parsed() {
        let generator = StaticGenerator(
            "```json\n{\"decision\": \"approved\", \"amount\": 500, \
             \"justification\": \"Clause B covers it.\", \"referenced_clauses\": [\"Clause B\"]}\n```",
        );

        let decision =
            evaluate_decision(Some(&generator), &ParsedQuery::default(), &retrieved()).await;

        assert_eq!(decision.decision, json!("approved"));
        assert_eq!(decision.amount, json!(500));
        assert_eq!(decision.referenced_clauses, json!(["Clause B"]));
        assert!(!decision.is_error());
    }

    #[tokio::test]
    async fn test_missing_keys_backfilled_with_null() {
        let generator = StaticGenerator("{\"decision\": \"rejected\"}");

        let decision =
            evaluate_decision(Some(&generator), &ParsedQuery::default(), &retrieved()).await;

        assert_eq!(decision.decision, json!("rejected"));
        assert_eq!(decision.amount, Value::Null);
        assert_eq!(decision.justification, Value::Null);
        assert_eq!(decision.referenced_clauses, Value::Null);

        // All four keys still appear on the wire.
        let wire = serde_json::to_value(&decision).unwrap();
        let object = wire.as_object().unwrap();
        for key in ["decision", "amount", "justification", "referenced_clauses"] {
            assert!(object.contains_key(key));
        }
    }

    #[tokio::test]
    async fn test_invalid_json_becomes_error_decision_with_raw_text() {
        let generator = StaticGenerator("The claim looks fine to me!");

        let decision =
            evaluate_decision(Some(&generator), &ParsedQuery::default(), &retrieved()).await;

        assert!(decision.is_error());
        let justification = decision.justification.as_str().unwrap();
        assert!(justification.contains("did not return valid JSON"));
        assert!(justification.contains("The claim looks fine to me!"));
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_error_decision() {
        let decision =
            evaluate_decision(Some(&FailingGenerator), &ParsedQuery::default(), &retrieved()).await;

        assert!(decision.is_error());
        assert!(
            decision
                .justification
                .as_str()
                .unwrap()
                .starts_with("[Error from Gemini Pro:")
        );
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_prompt_contains_clauses_and_query() {
        let parsed = crate::parse_query("45 year old male, knee surgery in Pune");
        let prompt = decision_prompt(&parsed, &retrieved());

        assert!(prompt.contains("Clause: Clause A: free."));
        assert!(prompt.contains("Clause: Clause B: up to $500."));
        assert!(prompt.contains("\"age\":45"));
        assert!(prompt.contains("Respond ONLY with a valid JSON object."));
    }
}
